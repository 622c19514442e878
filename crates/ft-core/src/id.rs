use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by every identity type.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter behind generated ids. Shared so ids never collide
/// across identity types even when prefixes match.
static COUNTER: AtomicU64 = AtomicU64::new(0);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $sigil:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                $name(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a fresh id with a prefix (e.g. `hotspot_4`, `frame_12`).
            pub fn with_prefix(prefix: &str) -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                Self::intern(&format!("{prefix}_{n}"))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $sigil, self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($name::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identity of a hotspot or input field. Stable for the box's lifetime.
    BoxId,
    "#"
);

interned_id!(
    /// Identity of a frame in the authoring collection.
    FrameId,
    "@"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = BoxId::intern("submit_button");
        let b = BoxId::intern("submit_button");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "submit_button");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = BoxId::with_prefix("hotspot");
        let b = BoxId::with_prefix("hotspot");
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_do_not_collide_across_types() {
        let frame = FrameId::with_prefix("x");
        let boxed = BoxId::with_prefix("x");
        assert_ne!(frame.as_str(), boxed.as_str());
    }

    #[test]
    fn debug_uses_sigil() {
        assert_eq!(format!("{:?}", FrameId::intern("f1")), "@f1");
        assert_eq!(format!("{:?}", BoxId::intern("b1")), "#b1");
        assert_eq!(BoxId::intern("b1").to_string(), "b1");
    }
}
