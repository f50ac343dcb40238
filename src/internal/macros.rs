//! A set of macros for easily working with internals.

/// Defines an enum backed by an integer tag, with an `Unknown` catch-all variant for values
/// Discord adds later.
///
/// The enum converts to and from its integer type, so it can be (de)serialized with
/// `#[serde(from = "u8", into = "u8")]`.
macro_rules! enum_number {
    (
        $(#[$outer:meta])*
        $vis:vis enum $Enum:ident {
            $(
                $(#[$vattr:meta])*
                $Variant:ident = $value:literal,
            )*
            _ => Unknown($T:ty),
        }
    ) => {
        $(#[$outer])*
        $vis enum $Enum {
            $(
                $(#[$vattr])*
                $Variant,
            )*
            /// Variant value is unknown.
            Unknown($T),
        }

        impl From<$T> for $Enum {
            fn from(value: $T) -> Self {
                match value {
                    $($value => Self::$Variant,)*
                    unk => Self::Unknown(unk),
                }
            }
        }

        impl From<$Enum> for $T {
            fn from(value: $Enum) -> Self {
                match value {
                    $($Enum::$Variant => $value,)*
                    $Enum::Unknown(unk) => unk,
                }
            }
        }
    };
}

/// Defines snowflake id newtypes.
///
/// Discord sends snowflakes as strings; they are accepted as either strings or integers and
/// always written back as strings.
macro_rules! id_u64 {
    ($($(#[$attr:meta])* $name:ident;)*) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
            pub struct $name(u64);

            impl $name {
                /// Creates a new Id from a u64.
                #[inline]
                #[must_use]
                pub const fn new(id: u64) -> Self {
                    Self(id)
                }

                /// Retrieves the inner snowflake.
                #[inline]
                #[must_use]
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for u64 {
                fn from(id: $name) -> u64 {
                    id.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    std::fmt::Display::fmt(&self.0, f)
                }
            }

            impl std::str::FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.parse().map(Self)
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D: serde::Deserializer<'de>>(
                    deserializer: D,
                ) -> std::result::Result<Self, D::Error> {
                    deserializer.deserialize_any($crate::model::utils::SnowflakeVisitor).map(Self)
                }
            }

            impl serde::Serialize for $name {
                fn serialize<S: serde::Serializer>(
                    &self,
                    serializer: S,
                ) -> std::result::Result<S::Ok, S::Error> {
                    serializer.collect_str(&self.0)
                }
            }
        )*
    };
}
