//! Progress bar display for downloads

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a single download
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// Create a progress bar for a download of `total` bytes, if known
    pub fn new(total: Option<u64>, label: String) -> Self {
        let bar = match total {
            Some(len) => {
                let style = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-");
                let bar = ProgressBar::new(len);
                bar.set_style(style);
                bar
            }
            None => {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner} {bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                let bar = ProgressBar::new_spinner();
                bar.set_style(style);
                bar
            }
        };

        // Truncate long names for display
        let display = if label.len() > 50 {
            let cut = label
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| label.len() - i <= 47)
                .unwrap_or(0);
            format!("...{}", &label[cut..])
        } else {
            label
        };
        bar.set_message(display);

        Self { bar }
    }

    /// Record `bytes` more bytes received
    pub fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    /// Finish the bar after a complete download
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
