use std::fmt;

/// Input vs. output size for the operator-facing summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl SizeReport {
    pub fn new(input_bytes: u64, output_bytes: u64) -> Self {
        Self {
            input_bytes,
            output_bytes,
        }
    }

    pub fn input_kb(&self) -> f64 {
        self.input_bytes as f64 / 1024.0
    }

    pub fn output_kb(&self) -> f64 {
        self.output_bytes as f64 / 1024.0
    }

    /// Percentage saved relative to the input; 0 for an empty input.
    pub fn reduction_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        100.0 - (self.output_bytes as f64 / self.input_bytes as f64 * 100.0)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   Original: {:.2} KB", self.input_kb())?;
        writeln!(f, "   Minified: {:.2} KB", self.output_kb())?;
        write!(f, "   Reduction: {:.1}%", self.reduction_percent())
    }
}
