//! [`KeyDescriptor`] → canonical raw key string.

use crate::operators::OperatorRegistry;

use super::{KeyDescriptor, LITERAL_ESCAPE, OperatorKind, parse_key};

impl KeyDescriptor {
    /// Encode the descriptor as a raw key, reading custom markers against
    /// the built-in operators only.
    ///
    /// # Examples
    ///
    /// ```
    /// use tree_ops::{KeyDescriptor, OperatorKind};
    ///
    /// let add = KeyDescriptor::new(OperatorKind::Add, "hp").with_foreach(true);
    /// assert_eq!(add.encode(), "#+hp");
    ///
    /// assert_eq!(KeyDescriptor::plain("*.kfg").encode(), "()*.kfg");
    /// assert_eq!(KeyDescriptor::plain("<x").encode(), "<x");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        self.encode_with(&OperatorRegistry::new())
    }

    /// Encode the descriptor as a raw key for `registry`.
    ///
    /// Plain keys only receive the `()` escape when the bare text would be
    /// read back as something else, so `(pow)a` is escaped only while `pow`
    /// is registered. Custom collections use the `(#name)key` form.
    #[must_use]
    pub fn encode_with(&self, registry: &OperatorRegistry) -> String {
        let hash = if self.is_foreach() { "#" } else { "" };
        let base = self.base_key();
        match self.operator() {
            OperatorKind::Assign => {
                let bare = format!("{hash}{base}");
                if self.reads_back_from(&bare, registry) {
                    bare
                } else {
                    format!("{hash}{LITERAL_ESCAPE}{base}")
                }
            }
            OperatorKind::Custom(name) => format!("({hash}{name}){base}"),
            other => format!("{hash}{}{base}", marker_text(other)),
        }
    }

    fn reads_back_from(&self, raw: &str, registry: &OperatorRegistry) -> bool {
        let parsed = parse_key(raw, registry);
        parsed.operator() == self.operator()
            && parsed.base_key() == self.base_key()
            && parsed.is_foreach() == self.is_foreach()
    }
}

fn marker_text(kind: &OperatorKind) -> String {
    match kind {
        OperatorKind::Assign | OperatorKind::Custom(_) => String::new(),
        OperatorKind::Add => "+".to_owned(),
        OperatorKind::Multiply => "*".to_owned(),
        OperatorKind::ConcatBefore => "<+".to_owned(),
        OperatorKind::ConcatAfter => "+>".to_owned(),
        OperatorKind::CombineBefore(level) => format!("{}*", repeat('<', *level)),
        OperatorKind::CombineAfter(level) => format!("*{}", repeat('>', *level)),
    }
}

fn repeat(ch: char, level: u32) -> String {
    std::iter::repeat_n(ch, usize::try_from(level).unwrap_or(usize::MAX)).collect()
}
