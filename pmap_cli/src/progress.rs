use std::io::{self, Write};
use std::time::Instant;

use pmap_core::Progress;

const BAR_WIDTH: usize = 40;

/// Console progress bar: `\r`-redrawn fixed-width bar, percentage, and an
/// ETA extrapolated from elapsed wall-clock time and blocks done so far.
/// Emits a trailing newline once `done == total`.
///
/// Generic over the sink so tests can render into a `Vec<u8>` instead of a
/// terminal; the pipeline itself only sees the [`Progress`] trait.
pub struct ConsoleBar<W: Write> {
    out: W,
    start: Instant,
}

impl ConsoleBar<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleBar<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            start: Instant::now(),
        }
    }
}

impl<W: Write> Progress for ConsoleBar<W> {
    fn update(&mut self, done: u64, total: u64) {
        if total == 0 {
            return;
        }
        let ratio = done as f64 / total as f64;
        let filled = ((ratio * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
        let elapsed = self.start.elapsed().as_secs_f64();
        let eta = if done > 0 {
            elapsed / done as f64 * (total - done) as f64
        } else {
            0.0
        };

        // rendering failures are not pipeline failures
        let _ = write!(
            self.out,
            "\r[{:#<filled$}{:width$}] {:3}% | ETA: {eta:.1}s",
            "",
            "",
            (ratio * 100.0) as u32,
            filled = filled,
            width = BAR_WIDTH - filled,
        );
        if done == total {
            let _ = writeln!(self.out);
        }
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bar_percentage_and_final_newline() {
        let mut sink = Vec::new();
        {
            let mut bar = ConsoleBar::new(&mut sink);
            bar.update(1, 4);
            bar.update(4, 4);
        }
        let rendered = String::from_utf8(sink).unwrap();
        assert!(rendered.contains(" 25%"));
        assert!(rendered.contains("100%"));
        assert!(rendered.contains("ETA:"));
        assert!(rendered.contains(&"#".repeat(BAR_WIDTH)));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn zero_total_renders_nothing() {
        let mut sink = Vec::new();
        ConsoleBar::new(&mut sink).update(0, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn bar_fill_tracks_progress() {
        let mut sink = Vec::new();
        ConsoleBar::new(&mut sink).update(1, 2);
        let rendered = String::from_utf8(sink).unwrap();
        assert!(rendered.contains(&format!("[{}{}]", "#".repeat(20), " ".repeat(20))));
        assert!(rendered.contains(" 50%"));
    }
}
