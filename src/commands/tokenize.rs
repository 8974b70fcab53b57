use crate::artifacts::diff::tokenizer;
use crate::commands::session::Session;

impl Session {
    pub fn tokenize(&self, text: &str) -> anyhow::Result<()> {
        for token in tokenizer::tokenize(text) {
            let class: &str = (&token.class).into();
            writeln!(
                self.writer(),
                "{}..{}\t{}\t{}",
                token.start,
                token.end,
                class,
                serde_json::to_string(token.text)?
            )?;
        }

        Ok(())
    }
}
