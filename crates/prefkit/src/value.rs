//! Tolerant string coercion for setting values
//!
//! Settings are always persisted as text so that a value written by one
//! build as `f32` can be read by a later build as `f64`, or a legacy `True`
//! can be read as `bool`. Parsing never panics; anything unparseable is
//! `None` and the caller falls back to its default.

/// A primitive that can be stored as a setting string
pub trait PrefValue: Sized {
    /// Name used in log messages
    const TYPE_NAME: &'static str;

    /// Parse a stored string, returning `None` if it is malformed
    fn parse_pref(raw: &str) -> Option<Self>;

    /// Format for storage. Output never depends on the process locale.
    fn format_pref(&self) -> String;
}

/// Parse an optional raw value, `None` if absent or malformed
pub fn try_parse<T: PrefValue>(raw: Option<&str>) -> Option<T> {
    raw.and_then(T::parse_pref)
}

impl PrefValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_pref(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn format_pref(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_pref_value_from_str {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl PrefValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn parse_pref(raw: &str) -> Option<Self> {
                    raw.trim().parse::<$ty>().ok()
                }

                fn format_pref(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

// `to_string` on floats is the shortest representation that round-trips,
// and `parse` accepts `NaN`/`inf`/`infinity` in any case.
impl_pref_value_from_str! {
    i32 => "int",
    i64 => "long",
    f32 => "float",
    f64 => "double",
}

impl PrefValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_pref(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn format_pref(&self) -> String {
        self.clone()
    }
}
