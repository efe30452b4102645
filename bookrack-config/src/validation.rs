//! Non-fatal findings collected while loading configuration.

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// What was noticed.
    pub message: String,
    /// How to silence it, when there is an obvious fix.
    pub hint: Option<String>,
}

/// Ordered collection of [`ConfigWarning`]s.
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    /// Findings in the order they were raised.
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    /// Records a finding without a hint.
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    /// Records a finding with a suggested fix.
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// True when loading raised nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Findings in order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}
