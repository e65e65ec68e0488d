//! Values joined into one message by the concatenating log forms.

use crate::level::Level;
use crate::suffix::SuffixFormat;
use std::borrow::Cow;
use std::fmt::{self, Display};

/// Something that can be concatenated into a log message.
///
/// Two neighbouring values are separated by a space when neither of them is a
/// string, so `1, 2, "x"` reads `1 2x`.
pub trait Value: Display {
    fn is_string(&self) -> bool {
        false
    }
}

impl Value for str {
    fn is_string(&self) -> bool {
        true
    }
}

impl Value for String {
    fn is_string(&self) -> bool {
        true
    }
}

impl Value for Cow<'_, str> {
    fn is_string(&self) -> bool {
        true
    }
}

impl Value for fmt::Arguments<'_> {
    fn is_string(&self) -> bool {
        true
    }
}

impl<T: Value + ?Sized> Value for &T {
    fn is_string(&self) -> bool {
        (**self).is_string()
    }
}

impl<T: Value + ?Sized> Value for Box<T> {
    fn is_string(&self) -> bool {
        (**self).is_string()
    }
}

macro_rules! non_string_values {
    ($($ty:ty),* $(,)?) => {
        $(impl Value for $ty {})*
    };
}

non_string_values!(
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64, bool, char,
    std::io::Error,
    std::net::IpAddr,
    std::net::SocketAddr,
    Level,
    SuffixFormat,
);

pub(crate) struct Concat<'a, 'b>(pub(crate) &'a [&'b dyn Value]);

impl Display for Concat<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous_is_string = true;
        for value in self.0 {
            let is_string = value.is_string();
            if !is_string && !previous_is_string {
                f.write_str(" ")?;
            }
            value.fmt(f)?;
            previous_is_string = is_string;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(values: &[&dyn Value]) -> String {
        Concat(values).to_string()
    }

    #[test]
    fn spaces_only_between_non_strings() {
        assert_eq!(joined(&[&1, &2, &"x"]), "1 2x");
        assert_eq!(joined(&[&1, &2, &"x", &3.5]), "1 2x3.5");
        assert_eq!(joined(&[&"took ", &42, &"ms"]), "took 42ms");
        assert_eq!(joined(&[&"a", &"b"]), "ab");
    }

    #[test]
    fn owned_and_borrowed_strings_count_as_strings() {
        let owned = String::from("id=");
        assert_eq!(joined(&[&owned, &7, &true]), "id=7 true");
        assert_eq!(joined(&[&Level::Warn, &Cow::Borrowed("!")]), "WARN!");
        assert_eq!(joined(&[]), "");
    }
}
