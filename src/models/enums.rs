//! Lifecycle status enums stored as MySQL `ENUM` columns

use sqlx::{
    error::BoxDynError,
    mysql::{MySql, MySqlTypeInfo, MySqlValueRef},
    Decode, Type,
};
use std::{fmt, str::FromStr};

/// Raised when a stored or typed label is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownStatus {
    kind: &'static str,
    value: String,
}

/// Normalize user input: "In repair", "in_repair" and "InRepair" are the same.
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Decode the enum from its column label (MySQL reports ENUM as text).
macro_rules! mysql_text_enum {
    ($ty:ty) => {
        impl Type<MySql> for $ty {
            fn type_info() -> MySqlTypeInfo {
                <str as Type<MySql>>::type_info()
            }

            fn compatible(ty: &MySqlTypeInfo) -> bool {
                <str as Type<MySql>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, MySql> for $ty {
            fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
                let label = <&str as Decode<MySql>>::decode(value)?;
                Ok(label.parse::<$ty>()?)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// BookStatus
// ---------------------------------------------------------------------------

/// Where a book currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookStatus {
    #[default]
    Available,
    Loaned,
    Lost,
    InRepair,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::Loaned,
        BookStatus::Lost,
        BookStatus::InRepair,
    ];

    /// Column value
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Loaned => "Loaned",
            BookStatus::Lost => "Lost",
            BookStatus::InRepair => "InRepair",
        }
    }
}

impl FromStr for BookStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "available" => Ok(BookStatus::Available),
            "loaned" => Ok(BookStatus::Loaned),
            "lost" => Ok(BookStatus::Lost),
            "inrepair" => Ok(BookStatus::InRepair),
            _ => Err(UnknownStatus {
                kind: "book status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookStatus::Available => "Available",
            BookStatus::Loaned => "Loaned",
            BookStatus::Lost => "Lost",
            BookStatus::InRepair => "In repair",
        };
        write!(f, "{}", label)
    }
}

mysql_text_enum!(BookStatus);

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoanStatus {
    #[default]
    Loaned,
    Returned,
    /// Declared by the schema; never written by this program.
    Overdue,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Loaned => "Loaned",
            LoanStatus::Returned => "Returned",
            LoanStatus::Overdue => "Overdue",
        }
    }

    /// Still out with the borrower
    pub fn is_active(&self) -> bool {
        matches!(self, LoanStatus::Loaned | LoanStatus::Overdue)
    }
}

impl FromStr for LoanStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "loaned" => Ok(LoanStatus::Loaned),
            "returned" => Ok(LoanStatus::Returned),
            "overdue" => Ok(LoanStatus::Overdue),
            _ => Err(UnknownStatus {
                kind: "loan status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

mysql_text_enum!(LoanStatus);
