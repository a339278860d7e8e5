use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Byte stream destination: a file, or stdout for "-".
pub struct OutputWriter {
    writer: Box<dyn Write>,
    is_pipe: bool,
}

impl OutputWriter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Result<Self> {
        let path = output_path.as_ref();
        let is_pipe = path.to_string_lossy() == "-";

        let writer: Box<dyn Write> = if is_pipe {
            Box::new(io::stdout().lock())
        } else {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        };

        Ok(Self { writer, is_pipe })
    }

    pub fn is_pipe(&self) -> bool {
        self.is_pipe
    }

    pub fn sink(&mut self) -> &mut dyn Write {
        self.writer.as_mut()
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
