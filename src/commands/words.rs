use crate::artifacts::diff::char_diff::diff_chars;
use crate::artifacts::diff::edit_script::DiffFilter;
use crate::artifacts::diff::word_diff::diff_words;
use crate::artifacts::render::terminal::paint;
use crate::commands::session::Session;
use crate::domain::mark::Granularity;

impl Session {
    /// Prints one `<sign><granularity>\t<text>` line per segment kept by `filter`.
    pub fn words(
        &self,
        old: &str,
        new: &str,
        granularity: Granularity,
        filter: DiffFilter,
    ) -> anyhow::Result<()> {
        let script = match granularity {
            Granularity::Char => diff_chars(old, new),
            Granularity::Word => diff_words(old, new),
        };

        for segment in script.filtered(filter) {
            let line = format!(
                "{}{}\t{}",
                segment.kind.sign(),
                segment.granularity,
                serde_json::to_string(&segment.text)?
            );
            writeln!(self.writer(), "{}", paint(&line, segment.diff_tag()))?;
        }

        Ok(())
    }
}
