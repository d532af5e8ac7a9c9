//! Common utilities for the gateway client crates

/// Wrappers that keep credentials and cardholder data out of logs.
///
/// Values wrapped in [`masking::Secret`] only reach the wire through
/// [`masking::PeekInterface::peek`] or [`masking::ExposeInterface::expose`]
/// at serialization and signing boundaries.
pub mod masking {
    use std::{fmt, marker::PhantomData};

    /// A secret value that masks its `Debug` output.
    #[derive(Clone, PartialEq, Eq, Hash)]
    pub struct Secret<T, S = ()>(T, PhantomData<S>);

    impl<T> Secret<T> {
        pub fn new(value: T) -> Self {
            Self(value, PhantomData)
        }
    }

    impl<T, S> From<T> for Secret<T, S> {
        fn from(value: T) -> Self {
            Self(value, PhantomData)
        }
    }

    impl<T: Default, S> Default for Secret<T, S> {
        fn default() -> Self {
            Self(T::default(), PhantomData)
        }
    }

    impl<T, S> fmt::Debug for Secret<T, S> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "*** {} ***", std::any::type_name::<T>())
        }
    }

    impl<T: serde::Serialize, S> serde::Serialize for Secret<T, S> {
        fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
        where
            Ser: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de, T: serde::Deserialize<'de>, S> serde::Deserialize<'de> for Secret<T, S> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            T::deserialize(deserializer).map(|value| Self(value, PhantomData))
        }
    }

    pub type StrongSecret<T, S = ()> = Secret<T, S>;

    pub trait PeekInterface<T> {
        fn peek(&self) -> &T;
    }

    impl<T, S> PeekInterface<T> for Secret<T, S> {
        fn peek(&self) -> &T {
            &self.0
        }
    }

    pub trait ExposeInterface<T> {
        fn expose(self) -> T;
    }

    impl<T, S> ExposeInterface<T> for Secret<T, S> {
        fn expose(self) -> T {
            self.0
        }
    }

    /// A value that is either plain or carries masking through logging.
    #[derive(Clone, PartialEq, Eq, Hash)]
    pub enum Maskable<T> {
        Masked(Secret<T>),
        Normal(T),
    }

    impl<T: Clone> Maskable<T> {
        pub fn into_inner(self) -> T {
            match self {
                Self::Masked(secret) => secret.expose(),
                Self::Normal(value) => value,
            }
        }
    }

    impl<T> From<T> for Maskable<T> {
        fn from(value: T) -> Self {
            Self::Normal(value)
        }
    }

    impl From<&str> for Maskable<String> {
        fn from(value: &str) -> Self {
            Self::Normal(value.to_owned())
        }
    }

    impl<T: fmt::Debug> fmt::Debug for Maskable<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Masked(secret) => secret.fmt(f),
                Self::Normal(value) => value.fmt(f),
            }
        }
    }

}

pub use masking::{ExposeInterface, Maskable, PeekInterface, Secret, StrongSecret};

pub mod crypto;
pub mod errors;
pub mod request;
pub mod types;

pub use errors::CustomResult;
pub use request::{Method, Request, RequestContent};
pub use types::{AmountConvertor, MinorUnit, StringMajorUnit, StringMajorUnitForConnector};

pub mod date_time {
    use time::{format_description::BorrowedFormatItem, Date};

    /// Format a calendar date as `2024-03-01`.
    pub fn date_as_yyyymmdd_hyphenated(date: Date) -> Result<String, time::error::Format> {
        const FORMAT: &[BorrowedFormatItem<'static>] = time::macros::format_description!(
            "[year repr:full]-[month padding:zero repr:numerical]-[day padding:zero]"
        );
        date.format(&FORMAT)
    }
}
