// src/formatting/state.rs
//! Formatting state threaded through block rendering.
//!
//! Every transition returns a new context, so sibling blocks never see
//! state a nested block set up for its own children.

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListKind {
    /// Current number for this level
    Numbered(usize),
    Bulleted,
}

/// Context that tracks list numbering and table rows while rendering.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    list_stack: Vec<ListKind>,
    /// Rows rendered so far in the current table, if inside one
    table_rows: Option<usize>,
}

impl FormatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_numbered_list(&self) -> Self {
        let mut next = self.clone();
        next.list_stack.push(ListKind::Numbered(1));
        next
    }

    pub fn enter_bulleted_list(&self) -> Self {
        let mut next = self.clone();
        next.list_stack.push(ListKind::Bulleted);
        next
    }

    /// Current number of the innermost numbered list; 1 outside one.
    pub fn current_list_number(&self) -> usize {
        match self.list_stack.last() {
            Some(ListKind::Numbered(n)) => *n,
            _ => 1,
        }
    }

    pub fn increment_list_number(&self) -> Self {
        let mut next = self.clone();
        if let Some(ListKind::Numbered(n)) = next.list_stack.last_mut() {
            *n += 1;
        }
        next
    }

    pub fn enter_table(&self) -> Self {
        let mut next = self.clone();
        next.table_rows = Some(0);
        next
    }

    /// Advances the table row counter.
    pub fn process_table_row(&self) -> Self {
        let mut next = self.clone();
        if let Some(rows) = next.table_rows.as_mut() {
            *rows += 1;
        }
        next
    }

    /// Whether the next row is the table's first, which carries the header separator.
    pub fn is_first_table_row(&self) -> bool {
        self.table_rows == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_is_per_level() {
        let outer = FormatContext::new().enter_numbered_list().increment_list_number();
        assert_eq!(outer.current_list_number(), 2);

        let inner = outer.enter_numbered_list();
        assert_eq!(inner.current_list_number(), 1);
        assert_eq!(inner.increment_list_number().current_list_number(), 2);

        assert_eq!(outer.enter_bulleted_list().current_list_number(), 1);
    }

    #[test]
    fn test_table_rows() {
        let ctx = FormatContext::new();
        assert!(!ctx.is_first_table_row());

        let table = ctx.enter_table();
        assert!(table.is_first_table_row());
        assert!(!table.process_table_row().is_first_table_row());
    }

    #[test]
    fn test_transitions_leave_source_context_unchanged() {
        let ctx = FormatContext::new().enter_numbered_list();
        let _ = ctx.increment_list_number().enter_table();
        assert_eq!(ctx.current_list_number(), 1);
        assert!(!ctx.is_first_table_row());
    }
}
