//! AWS enumeration vocabularies used with `StringEnum`

use crate::fwtypes::EnumValues;

macro_rules! enum_values {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl EnumValues for $name {
            const NAME: &'static str = stringify!($name);

            fn values() -> &'static [&'static str] {
                &[$($value),+]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Invalid {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        Self::values().join(", ")
                    )),
                }
            }
        }
    };
}

enum_values! {
    /// EC2 instance states that can be requested
    InstanceStateName {
        Running => "running",
        Stopped => "stopped",
    }
}

enum_values! {
    /// MediaLive input class
    InputClass {
        Standard => "STANDARD",
        SinglePipeline => "SINGLE_PIPELINE",
    }
}

enum_values! {
    /// MediaLive input state
    InputState {
        Creating => "CREATING",
        Detached => "DETACHED",
        Attached => "ATTACHED",
        Deleting => "DELETING",
        Deleted => "DELETED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_match_variants() {
        assert_eq!(InstanceStateName::values(), &["running", "stopped"]);
        assert_eq!(InputClass::SinglePipeline.as_str(), "SINGLE_PIPELINE");
        assert_eq!(InputState::NAME, "InputState");
    }

    #[test]
    fn parse_values() {
        assert_eq!("DETACHED".parse::<InputState>(), Ok(InputState::Detached));
        let err = "detached".parse::<InputState>().unwrap_err();
        assert!(err.contains("expected one of: CREATING, DETACHED"));
    }
}
