//! Database constraint violations organized by table.

mod article_comments;
mod articles;
mod event_registrations;
mod events;
mod moderation_logs;
mod users;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::article_comments::ArticleCommentConstraints;
pub use self::articles::ArticleConstraints;
pub use self::event_registrations::EventRegistrationConstraints;
pub use self::events::EventConstraints;
pub use self::moderation_logs::ModerationLogConstraints;
pub use self::users::UserConstraints;

/// Any named constraint of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    User(UserConstraints),
    Article(ArticleConstraints),
    ArticleComment(ArticleCommentConstraints),
    Event(EventConstraints),
    EventRegistration(EventRegistrationConstraints),
    ModerationLog(ModerationLogConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// ```
    /// use hustings_postgres::types::ConstraintViolation;
    ///
    /// assert!(ConstraintViolation::new("users_email_key").is_some());
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        match prefix {
            "users" => try_parse!(UserConstraints::new => User),
            "articles" => try_parse!(ArticleConstraints::new => Article),
            "article" => try_parse!(ArticleCommentConstraints::new => ArticleComment),
            "events" => try_parse!(EventConstraints::new => Event),
            "event" => try_parse!(EventRegistrationConstraints::new => EventRegistration),
            "moderation" => try_parse!(ModerationLogConstraints::new => ModerationLog),
            _ => None,
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::User(_) => "users",
            ConstraintViolation::Article(_) => "articles",
            ConstraintViolation::ArticleComment(_) => "article_comments",
            ConstraintViolation::Event(_) => "events",
            ConstraintViolation::EventRegistration(_) => "event_registrations",
            ConstraintViolation::ModerationLog(_) => "moderation_logs",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::User(c) => c.categorize(),
            ConstraintViolation::Article(c) => c.categorize(),
            ConstraintViolation::ArticleComment(c) => c.categorize(),
            ConstraintViolation::Event(c) => c.categorize(),
            ConstraintViolation::EventRegistration(c) => c.categorize(),
            ConstraintViolation::ModerationLog(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::User(c) => write!(f, "{}", c),
            ConstraintViolation::Article(c) => write!(f, "{}", c),
            ConstraintViolation::ArticleComment(c) => write!(f, "{}", c),
            ConstraintViolation::Event(c) => write!(f, "{}", c),
            ConstraintViolation::EventRegistration(c) => write!(f, "{}", c),
            ConstraintViolation::ModerationLog(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or_else(|| format!("unknown constraint: {value}"))
    }
}
