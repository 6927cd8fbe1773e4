//! Add/edit form state.
//!
//! A form remembers the values it was opened with so it can tell whether
//! anything changed, and which fields the user has touched so errors are
//! only shown for fields they have interacted with.

use crate::record::RecordDraft;
use crate::validation::{Field, FieldError, Rules, ValidationErrors};

/// One text input of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// Current text.
    pub value: String,
    /// Text the form was opened with.
    pub initial: String,
    /// Whether the user has edited or submitted this field.
    pub touched: bool,
}

impl FieldState {
    fn new(initial: &str) -> Self {
        Self {
            value: initial.to_string(),
            initial: initial.to_string(),
            touched: false,
        }
    }

    /// Whether the value differs from the initial one.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.value != self.initial
    }
}

/// State of the add or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    keyword: FieldState,
    description: FieldState,
    rules: Rules,
}

impl FormState {
    /// An empty form, as opened by "add".
    #[must_use]
    pub fn empty(rules: Rules) -> Self {
        Self::prefilled(&RecordDraft::default(), rules)
    }

    /// A form pre-filled from existing values, as opened by "edit".
    #[must_use]
    pub fn prefilled(draft: &RecordDraft, rules: Rules) -> Self {
        Self {
            keyword: FieldState::new(&draft.keyword),
            description: FieldState::new(&draft.description),
            rules,
        }
    }

    /// The state of `field`.
    #[must_use]
    pub fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Keyword => &self.keyword,
            Field::Description => &self.description,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Keyword => &mut self.keyword,
            Field::Description => &mut self.description,
        }
    }

    /// Current value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        &self.field(field).value
    }

    /// Set `field` and mark it touched.
    #[must_use]
    pub fn with_value(mut self, field: Field, value: impl Into<String>) -> Self {
        let slot = self.field_mut(field);
        slot.value = value.into();
        slot.touched = true;
        self
    }

    /// Mark every field touched, so all errors become visible.
    #[must_use]
    pub fn touched_all(mut self) -> Self {
        self.keyword.touched = true;
        self.description.touched = true;
        self
    }

    /// Whether any field differs from the values the form opened with.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.keyword.is_dirty() || self.description.is_dirty()
    }

    /// Errors for every field, touched or not.
    #[must_use]
    pub fn errors(&self) -> ValidationErrors {
        self.rules
            .check(&self.draft())
            .err()
            .unwrap_or_default()
    }

    /// Whether every field passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// The inline error to display next to `field`.
    ///
    /// Untouched fields show nothing.
    #[must_use]
    pub fn visible_error(&self, field: Field) -> Option<FieldError> {
        let state = self.field(field);
        if !state.touched {
            return None;
        }
        self.rules.check_field(field, &state.value)
    }

    /// Whether the save button is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_dirty() && self.is_valid()
    }

    /// The current values as a draft.
    #[must_use]
    pub fn draft(&self) -> RecordDraft {
        RecordDraft::new(self.keyword.value.clone(), self.description.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_is_pristine_and_invalid() {
        let form = FormState::empty(Rules::default());
        assert!(!form.is_dirty());
        assert!(!form.is_valid());
        assert!(!form.can_submit());
        // Nothing touched yet, so nothing shown.
        assert!(form.visible_error(Field::Keyword).is_none());
    }

    #[test]
    fn test_with_value_touches_field() {
        let form = FormState::empty(Rules::default()).with_value(Field::Keyword, "ab");

        assert!(form.field(Field::Keyword).touched);
        assert!(!form.field(Field::Description).touched);
        assert_eq!(
            form.visible_error(Field::Keyword),
            Some(FieldError::TooShort { min: 3 })
        );
        assert!(form.visible_error(Field::Description).is_none());
    }

    #[test]
    fn test_touched_all_reveals_errors() {
        let form = FormState::empty(Rules::default()).touched_all();
        assert_eq!(form.visible_error(Field::Keyword), Some(FieldError::Required));
        assert_eq!(
            form.visible_error(Field::Description),
            Some(FieldError::Required)
        );
    }

    #[test]
    fn test_valid_dirty_form_can_submit() {
        let form = FormState::empty(Rules::default())
            .with_value(Field::Keyword, "cat")
            .with_value(Field::Description, "meows");

        assert!(form.can_submit());
        assert_eq!(form.draft(), RecordDraft::new("cat", "meows"));
    }

    #[test]
    fn test_prefilled_form_not_dirty_until_changed() {
        let form = FormState::prefilled(&RecordDraft::new("fox", "jumps"), Rules::default());
        assert!(form.is_valid());
        assert!(!form.is_dirty());
        assert!(!form.can_submit());

        let form = form.with_value(Field::Description, "leaps");
        assert!(form.is_dirty());
        assert!(form.can_submit());

        // Typing the initial value back makes it pristine again.
        let form = form.with_value(Field::Description, "jumps");
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_errors_lists_all_fields() {
        let form = FormState::empty(Rules::default()).with_value(Field::Keyword, "okay");
        let errors = form.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Description), Some(FieldError::Required));
    }
}
