//! Validation rules.
//!
//! A [`Rule`] maps a field value (and optionally a snapshot of the other
//! fields) to `Ok(())` or `Err(message)`, where the message is what the
//! user sees. Rules are pure and synchronous and hold no reference to the
//! form-state manager, so a manager can run them inline whenever it
//! validates a field.
//!
//! `None` stands for a value that is missing altogether.
//!
//! Default messages are Vietnamese; every builder takes a replacement via
//! `with_message`.

use crate::snapshot::FormSnapshot;
use crate::value::FieldValue;
use regex::Regex;
use std::sync::LazyLock;

/// Outcome of a rule: `Err` carries the user-facing message.
pub type ValidationResult = Result<(), String>;

const REQUIRED_MESSAGE: &str = "Trường này là bắt buộc";
const EMAIL_MESSAGE: &str = "Email không hợp lệ";
const PHONE_MESSAGE: &str = "Số điện thoại không hợp lệ";
const NUMERIC_MESSAGE: &str = "Phải là số";
const PATTERN_MESSAGE: &str = "Giá trị không hợp lệ";

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Vietnamese mobile numbers: `0`, a carrier digit, eight more digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[35789][0-9]{8}$").expect("Invalid phone regex"));

/// Trait for validation rules.
///
/// # Examples
///
/// ```rust
/// use fieldkit::validate::{min_length, Rule};
/// use fieldkit::FieldValue;
///
/// let rule = min_length(3);
/// assert!(rule.check(Some(&FieldValue::from("abc"))).is_ok());
/// assert_eq!(
///     rule.check(Some(&FieldValue::from("ab"))),
///     Err("Phải có ít nhất 3 ký tự".to_string())
/// );
/// ```
pub trait Rule: Send + Sync {
    /// Check a value with access to the other fields of the form.
    fn check_in(&self, value: Option<&FieldValue>, form: &FormSnapshot) -> ValidationResult;

    /// Check a value on its own.
    fn check(&self, value: Option<&FieldValue>) -> ValidationResult {
        self.check_in(value, &FormSnapshot::new())
    }

    /// Human-readable description for debugging.
    fn description(&self) -> String;
}

fn verdict(ok: bool, message: &str) -> ValidationResult {
    if ok {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Fails on missing and empty values.
///
/// Empty means: empty text, a cleared number input, an empty choice, no
/// file list, or an empty file list. `0` and `false` pass.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    /// Rule with the default message.
    pub fn new() -> Self {
        Self {
            message: REQUIRED_MESSAGE.to_string(),
        }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Required {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        verdict(value.is_some_and(|v| !v.is_empty()), &self.message)
    }

    fn description(&self) -> String {
        "required".to_string()
    }
}

/// Fails unless the value looks like `local@domain.tld`.
///
/// Only the shape is checked: no whitespace, exactly one `@`, and a dot
/// inside the domain with text on both sides.
#[derive(Debug, Clone)]
pub struct Email {
    message: String,
}

impl Email {
    /// Rule with the default message.
    pub fn new() -> Self {
        Self {
            message: EMAIL_MESSAGE.to_string(),
        }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Email {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        let ok = value
            .and_then(FieldValue::as_text)
            .is_some_and(|text| EMAIL_REGEX.is_match(&text));
        verdict(ok, &self.message)
    }

    fn description(&self) -> String {
        "email".to_string()
    }
}

/// Fails unless the value is a Vietnamese mobile number.
///
/// Whitespace is ignored (so formatted numbers pass). The rest must be
/// exactly ten digits: `0`, one of `3 5 7 8 9`, then eight more digits.
#[derive(Debug, Clone)]
pub struct Phone {
    message: String,
}

impl Phone {
    /// Rule with the default message.
    pub fn new() -> Self {
        Self {
            message: PHONE_MESSAGE.to_string(),
        }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for Phone {
    fn default() -> Self {
        Self::new()
    }
}

fn is_mobile_number(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_REGEX.is_match(&compact)
}

impl Rule for Phone {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        let ok = value
            .and_then(FieldValue::as_text)
            .is_some_and(|text| is_mobile_number(&text));
        verdict(ok, &self.message)
    }

    fn description(&self) -> String {
        "phone".to_string()
    }
}

/// Fails when the value is shorter than `min` characters.
#[derive(Debug, Clone)]
pub struct MinLength {
    min: usize,
    message: Option<String>,
}

impl MinLength {
    /// Rule requiring at least `min` characters.
    pub fn new(min: usize) -> Self {
        Self { min, message: None }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Phải có ít nhất {} ký tự", self.min))
    }
}

impl Rule for MinLength {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        match value.and_then(FieldValue::length) {
            Some(len) if len >= self.min => Ok(()),
            _ => Err(self.message()),
        }
    }

    fn description(&self) -> String {
        format!("min length {}", self.min)
    }
}

/// Fails when the value is longer than `max` characters.
#[derive(Debug, Clone)]
pub struct MaxLength {
    max: usize,
    message: Option<String>,
}

impl MaxLength {
    /// Rule allowing at most `max` characters.
    pub fn new(max: usize) -> Self {
        Self { max, message: None }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Không được vượt quá {} ký tự", self.max))
    }
}

impl Rule for MaxLength {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        match value.and_then(FieldValue::length) {
            Some(len) if len <= self.max => Ok(()),
            _ => Err(self.message()),
        }
    }

    fn description(&self) -> String {
        format!("max length {}", self.max)
    }
}

/// Fails unless the value coerces to a number.
///
/// Coercion follows [`FieldValue::to_number`]: `"12"` and `""` pass,
/// `"12a"` and missing values fail.
#[derive(Debug, Clone)]
pub struct Numeric {
    message: String,
}

impl Numeric {
    /// Rule with the default message.
    pub fn new() -> Self {
        Self {
            message: NUMERIC_MESSAGE.to_string(),
        }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Numeric {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        verdict(value.and_then(FieldValue::to_number).is_some(), &self.message)
    }

    fn description(&self) -> String {
        "numeric".to_string()
    }
}

/// Fails when the value is below `min` (inclusive bound).
#[derive(Debug, Clone)]
pub struct MinValue {
    min: f64,
    message: Option<String>,
}

impl MinValue {
    /// Rule requiring a value of at least `min`.
    pub fn new(min: f64) -> Self {
        Self { min, message: None }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Giá trị phải lớn hơn hoặc bằng {}", self.min))
    }
}

impl Rule for MinValue {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        match value.and_then(FieldValue::to_number) {
            Some(n) if n >= self.min => Ok(()),
            _ => Err(self.message()),
        }
    }

    fn description(&self) -> String {
        format!("min value {}", self.min)
    }
}

/// Fails when the value is above `max` (inclusive bound).
#[derive(Debug, Clone)]
pub struct MaxValue {
    max: f64,
    message: Option<String>,
}

impl MaxValue {
    /// Rule requiring a value of at most `max`.
    pub fn new(max: f64) -> Self {
        Self { max, message: None }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Giá trị phải nhỏ hơn hoặc bằng {}", self.max))
    }
}

impl Rule for MaxValue {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        match value.and_then(FieldValue::to_number) {
            Some(n) if n <= self.max => Ok(()),
            _ => Err(self.message()),
        }
    }

    fn description(&self) -> String {
        format!("max value {}", self.max)
    }
}

/// Fails unless the text of the value matches a regular expression.
///
/// The expression is not anchored; add `^`/`$` to match the whole value.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    /// Rule requiring text matching `regex`.
    pub fn new(regex: Regex) -> Self {
        Self {
            regex,
            message: PATTERN_MESSAGE.to_string(),
        }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Rule for Pattern {
    fn check_in(&self, value: Option<&FieldValue>, _form: &FormSnapshot) -> ValidationResult {
        let ok = value
            .and_then(FieldValue::as_text)
            .is_some_and(|text| self.regex.is_match(&text));
        verdict(ok, &self.message)
    }

    fn description(&self) -> String {
        format!("pattern {}", self.regex.as_str())
    }
}

/// A rule that only applies while a condition on the other fields holds.
///
/// # Examples
///
/// ```rust
/// use fieldkit::validate::{Conditional, Required, Rule};
/// use fieldkit::FormSnapshot;
///
/// let rule = Conditional::new(
///     |form| form.get("has_company") == Some(&true.into()),
///     Required::new(),
///     "company name when employed",
/// );
///
/// let mut form = FormSnapshot::new();
/// form.set("has_company", false);
/// assert!(rule.check_in(None, &form).is_ok());
///
/// form.set("has_company", true);
/// assert!(rule.check_in(None, &form).is_err());
/// ```
pub struct Conditional {
    condition: Box<dyn Fn(&FormSnapshot) -> bool + Send + Sync>,
    rule: Box<dyn Rule>,
    description: String,
}

impl Conditional {
    /// Create a new conditional rule.
    ///
    /// # Arguments
    ///
    /// * `condition` - Decides from the other fields whether `rule` applies
    /// * `rule` - The rule to run while the condition holds
    /// * `description` - Human-readable description for debugging
    pub fn new<F, R>(condition: F, rule: R, description: impl Into<String>) -> Self
    where
        F: Fn(&FormSnapshot) -> bool + Send + Sync + 'static,
        R: Rule + 'static,
    {
        Self {
            condition: Box::new(condition),
            rule: Box::new(rule),
            description: description.into(),
        }
    }
}

impl Rule for Conditional {
    fn check_in(&self, value: Option<&FieldValue>, form: &FormSnapshot) -> ValidationResult {
        if (self.condition)(form) {
            self.rule.check_in(value, form)
        } else {
            Ok(())
        }
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

impl std::fmt::Debug for Conditional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conditional")
            .field("description", &self.description)
            .field("rule", &format!("<{}>", self.rule.description()))
            .finish()
    }
}

/// A rule backed by a closure.
///
/// # Examples
///
/// ```rust
/// use fieldkit::validate::{FnRule, Rule};
/// use fieldkit::FieldValue;
///
/// let confirm = FnRule::new("matches password", |value, form| {
///     if value == form.get("password") {
///         Ok(())
///     } else {
///         Err("Mật khẩu không khớp".to_string())
///     }
/// });
///
/// let mut form = fieldkit::FormSnapshot::new();
/// form.set("password", "hunter22");
/// assert!(confirm.check_in(Some(&FieldValue::from("hunter22")), &form).is_ok());
/// assert!(confirm.check_in(Some(&FieldValue::from("hunter2")), &form).is_err());
/// ```
pub struct FnRule {
    check: Box<dyn Fn(Option<&FieldValue>, &FormSnapshot) -> ValidationResult + Send + Sync>,
    description: String,
}

impl FnRule {
    /// Wrap `check` as a rule.
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<&FieldValue>, &FormSnapshot) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
            description: description.into(),
        }
    }
}

impl Rule for FnRule {
    fn check_in(&self, value: Option<&FieldValue>, form: &FormSnapshot) -> ValidationResult {
        (self.check)(value, form)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

impl std::fmt::Debug for FnRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRule")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// An ordered list of rules; the first failure wins.
///
/// # Examples
///
/// ```rust
/// use fieldkit::validate::{email, required, Rule, Rules};
/// use fieldkit::FieldValue;
///
/// let rules = Rules::new().with(required()).with(email());
///
/// assert_eq!(rules.check(None), Err("Trường này là bắt buộc".to_string()));
/// assert_eq!(
///     rules.check(Some(&FieldValue::from("nope"))),
///     Err("Email không hợp lệ".to_string())
/// );
/// assert!(rules.check(Some(&FieldValue::from("a@b.vn"))).is_ok());
/// ```
#[derive(Default)]
pub struct Rules {
    rules: Vec<Box<dyn Rule>>,
}

impl Rules {
    /// Rule with the default message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Append an already boxed rule.
    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule was added.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rule for Rules {
    fn check_in(&self, value: Option<&FieldValue>, form: &FormSnapshot) -> ValidationResult {
        self.rules
            .iter()
            .try_for_each(|rule| rule.check_in(value, form))
    }

    fn description(&self) -> String {
        self.rules
            .iter()
            .map(|rule| rule.description())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rules")
            .field("rules", &self.description())
            .finish()
    }
}

/// Shorthand for [`Required::new`].
pub fn required() -> Required {
    Required::new()
}

/// Shorthand for [`Email::new`].
pub fn email() -> Email {
    Email::new()
}

/// Shorthand for [`Phone::new`].
pub fn phone() -> Phone {
    Phone::new()
}

/// Shorthand for [`MinLength::new`].
pub fn min_length(min: usize) -> MinLength {
    MinLength::new(min)
}

/// Shorthand for [`MaxLength::new`].
pub fn max_length(max: usize) -> MaxLength {
    MaxLength::new(max)
}

/// Shorthand for [`Numeric::new`].
pub fn numeric() -> Numeric {
    Numeric::new()
}

/// Shorthand for [`MinValue::new`].
pub fn min_value(min: f64) -> MinValue {
    MinValue::new(min)
}

/// Shorthand for [`MaxValue::new`].
pub fn max_value(max: f64) -> MaxValue {
    MaxValue::new(max)
}

/// Shorthand for [`Pattern::new`].
pub fn pattern(regex: Regex) -> Pattern {
    Pattern::new(regex)
}
