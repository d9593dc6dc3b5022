//! Headless form dialog built from an entity's field declarations.
//!
//! The dialog owns one widget per field, chosen by [`FieldKind`]. It is modal:
//! once saved or cancelled every mutating call fails with [`FormError::Closed`].

use chrono::NaiveDate;
use models::record::value_as_text;
use models::{EntityDescriptor, FieldDescriptor, FieldKind, FieldMap};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::dates::{format_date, parse_date_text, today};
use crate::errors::FormError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    /// Picker holding a date; `typed` keeps text that did not parse.
    DatePicker { date: NaiveDate, typed: Option<String> },
    TextArea(String),
    EmailInput { text: String, valid: bool },
    LineInput(String),
}

impl Widget {
    fn for_field(field: &FieldDescriptor, initial: Option<&Value>) -> Self {
        let text = initial.and_then(value_as_text).map(|t| t.into_owned()).unwrap_or_default();
        match field.kind {
            FieldKind::Date => Self::DatePicker { date: parse_date_text(&text).unwrap_or_else(today), typed: None },
            FieldKind::LongText => Self::TextArea(text),
            FieldKind::Email => {
                let valid = is_valid_email(&text);
                Self::EmailInput { text, valid }
            }
            FieldKind::Text => Self::LineInput(text),
        }
    }

    /// What the widget currently shows.
    pub fn display(&self) -> String {
        match self {
            Self::DatePicker { typed: Some(t), .. } => t.clone(),
            Self::DatePicker { date, .. } => date.format("%d/%m/%Y").to_string(),
            Self::TextArea(t) | Self::LineInput(t) => t.clone(),
            Self::EmailInput { text, .. } => text.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    Editing,
    Saved,
    Cancelled,
}

/// Field name to submitted text, in declared order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormResult(Vec<(&'static str, String)>);

impl FormResult {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|(name, _)| *name == field).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(name, v)| (*name, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON body for the create and update endpoints.
    pub fn to_fields(&self) -> FieldMap {
        self.0.iter().map(|(name, v)| (name.to_string(), Value::String(v.clone()))).collect()
    }
}

pub struct FormDialog {
    title: String,
    fields: &'static [FieldDescriptor],
    widgets: Vec<Widget>,
    state: DialogState,
    result: Option<FormResult>,
}

impl FormDialog {
    /// Open a dialog over `fields`, seeding widgets from `initial` by field name.
    pub fn open(title: impl Into<String>, fields: &'static [FieldDescriptor], initial: Option<&FieldMap>) -> Self {
        let widgets = fields.iter().map(|f| Widget::for_field(f, initial.and_then(|m| m.get(f.name)))).collect();
        Self { title: title.into(), fields, widgets, state: DialogState::Editing, result: None }
    }

    /// "Nuevo X" for a blank form, "Editar X" when seeded from a record.
    pub fn open_for(descriptor: &'static EntityDescriptor, initial: Option<&FieldMap>) -> Self {
        let verb = if initial.is_some() { "Editar" } else { "Nuevo" };
        Self::open(format!("{verb} {}", descriptor.name), descriptor.fields, initial)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Editing
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &Widget)> {
        self.fields.iter().zip(self.widgets.iter())
    }

    pub fn widget(&self, field: &str) -> Option<&Widget> {
        self.position(field).map(|i| &self.widgets[i])
    }

    /// Email validity indicator; `None` for non-email fields.
    pub fn email_indicator(&self, field: &str) -> Option<bool> {
        match self.widget(field)? {
            Widget::EmailInput { valid, .. } => Some(*valid),
            _ => None,
        }
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    fn editable(&mut self, field: &str) -> Result<&mut Widget, FormError> {
        if !self.is_open() {
            return Err(FormError::Closed);
        }
        let idx = self.position(field).ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        Ok(&mut self.widgets[idx])
    }

    /// Replace a field's text as if typed by the user.
    pub fn input(&mut self, field: &str, text: &str) -> Result<(), FormError> {
        match self.editable(field)? {
            Widget::DatePicker { date, typed } => match parse_date_text(text) {
                Some(parsed) => {
                    *date = parsed;
                    *typed = None;
                }
                None => *typed = Some(text.to_string()),
            },
            Widget::TextArea(t) | Widget::LineInput(t) => *t = text.to_string(),
            Widget::EmailInput { text: t, valid } => {
                *t = text.to_string();
                *valid = is_valid_email(text);
            }
        }
        Ok(())
    }

    pub fn pick_date(&mut self, field: &str, picked: NaiveDate) -> Result<(), FormError> {
        match self.editable(field)? {
            Widget::DatePicker { date, typed } => {
                *date = picked;
                *typed = None;
                Ok(())
            }
            _ => Err(FormError::NotADate(field.to_string())),
        }
    }

    /// Validate in declared order. The first failure keeps the dialog open;
    /// success closes it with the result.
    pub fn save(&mut self) -> Result<FormResult, FormError> {
        if !self.is_open() {
            return Err(FormError::Closed);
        }
        let mut values = Vec::with_capacity(self.fields.len());
        for (field, widget) in self.fields.iter().zip(&self.widgets) {
            let value = match widget {
                Widget::DatePicker { typed: Some(t), .. } if !t.trim().is_empty() => {
                    return Err(FormError::InvalidDate { label: field.label.to_string() });
                }
                Widget::DatePicker { typed: Some(_), .. } => String::new(),
                Widget::DatePicker { date, .. } => format_date(*date),
                Widget::TextArea(t) | Widget::LineInput(t) => t.trim().to_string(),
                Widget::EmailInput { text, .. } => text.trim().to_string(),
            };
            if value.is_empty() {
                if field.required {
                    return Err(FormError::Required { label: field.label.to_string() });
                }
                continue;
            }
            if matches!(widget, Widget::EmailInput { valid: false, .. }) {
                return Err(FormError::InvalidEmail);
            }
            values.push((field.name, value));
        }
        let result = FormResult(values);
        debug!(title = %self.title, fields = result.len(), "form_saved");
        self.state = DialogState::Saved;
        self.result = Some(result.clone());
        Ok(result)
    }

    pub fn cancel(&mut self) -> Result<(), FormError> {
        if !self.is_open() {
            return Err(FormError::Closed);
        }
        self.state = DialogState::Cancelled;
        Ok(())
    }

    pub fn result(&self) -> Option<&FormResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<FormResult> {
        self.result
    }
}
