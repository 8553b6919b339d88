//! Assertion library.
//!
//! Every predicate operates on the [`CaseHandle`] it is given; there is no
//! ambient "current test". A mismatch appends a diagnostic (predicate,
//! expected, actual, description) and marks the case failed; no panic ever
//! crosses the assertion boundary.

use std::fmt;

use similar::{ChangeTag, TextDiff};

use crate::case::CaseHandle;

impl CaseHandle {
    /// Assert that `actual` equals `expected`.
    pub fn assert_eq<T>(&self, actual: &T, expected: &T, description: &str)
    where
        T: fmt::Debug + PartialEq,
    {
        if actual == expected {
            return;
        }

        self.record_failure(format!(
            "assert_eq: {description}: expected {expected:?}, got {actual:?}"
        ));
    }

    /// Assert that two pieces of text match. Multi-line mismatches include a
    /// line diff in the diagnostic.
    pub fn assert_text(&self, actual: &str, expected: &str, description: &str) {
        if actual == expected {
            return;
        }

        let mut message = format!(
            "assert_text: {description}: expected {expected:?}, got {actual:?}"
        );
        if expected.contains('\n') || actual.contains('\n') {
            message.push('\n');
            message.push_str(&unified_diff(expected, actual));
        }
        self.record_failure(message);
    }

    /// Assert that `condition` holds.
    pub fn assert_true(&self, condition: bool, description: &str) {
        if !condition {
            self.record_failure(format!("assert_true: {description}"));
        }
    }

    /// Assert that `condition` does not hold.
    pub fn assert_false(&self, condition: bool, description: &str) {
        if condition {
            self.record_failure(format!("assert_false: {description}"));
        }
    }

    /// Assert that a fallible operation succeeded.
    pub fn assert_ok<T, E>(&self, result: &Result<T, E>, description: &str)
    where
        T: fmt::Debug,
        E: fmt::Debug,
    {
        if let Err(e) = result {
            self.record_failure(format!(
                "assert_ok: {description}: unexpected error {e:?}"
            ));
        }
    }

    /// Assert that a fallible operation failed. The error value is the
    /// expected signal under test.
    pub fn assert_err<T, E>(&self, result: &Result<T, E>, description: &str)
    where
        T: fmt::Debug,
        E: fmt::Debug,
    {
        if let Ok(v) = result {
            self.record_failure(format!(
                "assert_err: {description}: expected an error, got Ok({v:?})"
            ));
        }
    }

    /// Assert that an optional value is present.
    pub fn assert_some<T: fmt::Debug>(&self, value: &Option<T>, description: &str) {
        if value.is_none() {
            self.record_failure(format!("assert_some: {description}: got None"));
        }
    }

    /// Assert that an optional value is absent.
    pub fn assert_none<T: fmt::Debug>(&self, value: &Option<T>, description: &str) {
        if let Some(v) = value {
            self.record_failure(format!(
                "assert_none: {description}: expected None, got Some({v:?})"
            ));
        }
    }

    /// Unconditionally fail the case.
    pub fn fail(&self, description: &str) {
        self.record_failure(format!("fail: {description}"));
    }
}

/// Line diff between expected and actual, for multi-line values.
fn unified_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(sign);
        out.push_str(change.value());
        if !change.value().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
