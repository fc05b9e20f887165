//! Per-configuration progress tracking with automatic batching

use crate::generation::engine::GenerationObserver;
use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates progress display for a generation run
///
/// Shows one bar per layer configuration while there are few of them and adds
/// a single aggregate bar once there are more than
/// [`MAX_INDIVIDUAL_PROGRESS_BARS`]; only the most recent configurations keep
/// an individual bar.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    configuration_bars: Vec<ProgressBar>,
    /// Stores (`label`, `accepted`, `target`) for rolling window display
    configuration_states: Vec<(String, usize, usize)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Configurations: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            configuration_bars: Vec::new(),
            configuration_states: Vec::new(),
        }
    }

    /// Create the bars for `configuration_count` layer configurations
    pub fn initialize(&mut self, configuration_count: usize) {
        if configuration_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(configuration_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = configuration_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.configuration_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Number of individual bars currently allocated
    pub fn bar_count(&self) -> usize {
        self.configuration_bars.len()
    }

    /// Whether an aggregate bar is shown
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All configurations generated");
        }
        let _ = self.multi_progress.clear();
    }

    /// Update the bars to show the last N active configurations
    fn update_bars(&self) {
        let active: Vec<_> = self
            .configuration_states
            .iter()
            .filter(|(label, _, _)| !label.is_empty())
            .collect();

        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (label, current, max)) in visible.iter().enumerate() {
            if let Some(bar) = self.configuration_bars.get(bar_idx) {
                bar.set_length(*max as u64);
                bar.set_position(*current as u64);
                let max_width = max.to_string().len();
                bar.set_message(format!("{current:>max_width$}/{max}"));
                bar.set_prefix(label.clone());
            }
        }

        for bar_idx in visible.len()..self.configuration_bars.len() {
            if let Some(bar) = self.configuration_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}

impl GenerationObserver for ProgressManager {
    fn configuration_started(&mut self, index: usize, editions: usize) {
        if index >= self.configuration_states.len() {
            self.configuration_states
                .resize(index + 1, (String::new(), 0, 0));
        }
        if let Some(state) = self.configuration_states.get_mut(index) {
            *state = (format!("configuration {}", index + 1), 0, editions);
        }
        self.update_bars();
    }

    fn edition_completed(&mut self, index: usize, _edition: usize) {
        if let Some(state) = self.configuration_states.get_mut(index) {
            state.1 += 1;
        }
        self.update_bars();
    }

    fn configuration_completed(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.configuration_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = state.2;
        }
        self.update_bars();
    }
}
