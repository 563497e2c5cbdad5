//! Line-oriented assembly of generated scripts.

/// Where a generated script takes its target host from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetHost {
    /// `TARGET_IP` environment variable only.
    Env,
    /// `TARGET_IP`, falling back to the first script argument.
    EnvOrArg,
}

impl TargetHost {
    pub fn statement(self) -> &'static str {
        match self {
            TargetHost::Env => r#"host = os.getenv("TARGET_IP")"#,
            TargetHost::EnvOrArg => r#"host = os.getenv("TARGET_IP", sys.argv[1])"#,
        }
    }
}

/// Text buffer that keeps generated scripts free of stray blank lines.
#[derive(Debug, Default)]
pub struct ScriptWriter {
    out: String,
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.out.push_str(line.as_ref());
        self.out.push('\n');
        self
    }

    /// Separator line; collapses repeats and is a no-op at the start.
    pub fn blank(&mut self) -> &mut Self {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_never_stack() {
        let mut w = ScriptWriter::new();
        w.blank().line("import os").blank().blank().line(TargetHost::Env.statement()).blank();
        assert_eq!(w.finish(), "import os\n\nhost = os.getenv(\"TARGET_IP\")\n\n");
    }
}
