use colored::Colorize;
use std::io::Write;

use todo_core::{TodoFilter, TodoItem, TodoStats, TodoView};

use crate::ids::short_id;

/// Prints the list to any writer, stdout in the binary.
pub struct TerminalView<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(
        &mut self,
        items: &[TodoItem],
        stats: TodoStats,
        filter: TodoFilter,
    ) -> std::io::Result<()> {
        if items.is_empty() {
            writeln!(self.out, "{}", "No todos to show.".dimmed())?;
        }
        for item in items {
            let id = short_id(&item.id);
            if item.completed {
                writeln!(
                    self.out,
                    "  {} {}  {}",
                    "[x]".green(),
                    id.dimmed(),
                    item.text.strikethrough().dimmed()
                )?;
            } else {
                writeln!(self.out, "  [ ] {}  {}", id.dimmed(), item.text)?;
            }
        }

        let noun = if stats.active == 1 { "item" } else { "items" };
        writeln!(
            self.out,
            "{} {} left, {} completed (showing {})",
            stats.active, noun, stats.completed, filter
        )?;
        self.out.flush()
    }
}

impl<W: Write + Send> TodoView for TerminalView<W> {
    fn render(&mut self, items: &[TodoItem], stats: TodoStats, filter: TodoFilter) {
        if let Err(e) = self.write_frame(items, stats, filter) {
            log::warn!("Failed to write todo list: {}", e);
        }
    }
}
