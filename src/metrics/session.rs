use std::time::{Duration, Instant};

/// Per-session counters shown in the HUD
pub struct SessionMetrics {
    last_update: Instant,
    /// Time spent Running in the current game; paused time is not counted
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub highest_level: u32,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            highest_level: 1,
        }
    }

    pub fn update(&mut self, running: bool) {
        self.update_at(Instant::now(), running);
    }

    pub fn update_at(&mut self, now: Instant, running: bool) {
        if running {
            self.elapsed_time += now.saturating_duration_since(self.last_update);
        }
        self.last_update = now;
    }

    pub fn on_game_start(&mut self) {
        self.last_update = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, level: u32) {
        self.games_played += 1;
        self.highest_level = self.highest_level.max(level);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = SessionMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_paused_time_not_counted() {
        let mut metrics = SessionMetrics::new();
        let start = Instant::now();
        metrics.update_at(start, false);

        metrics.update_at(start + Duration::from_secs(2), true);
        assert_eq!(metrics.elapsed_time, Duration::from_secs(2));

        metrics.update_at(start + Duration::from_secs(10), false);
        assert_eq!(metrics.elapsed_time, Duration::from_secs(2));

        metrics.update_at(start + Duration::from_secs(11), true);
        assert_eq!(metrics.elapsed_time, Duration::from_secs(3));
    }

    #[test]
    fn test_game_over_tracking() {
        let mut metrics = SessionMetrics::new();

        metrics.on_game_over(3);
        metrics.on_game_over(2);
        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.highest_level, 3);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = SessionMetrics::new();
        metrics.elapsed_time = Duration::from_secs(40);

        metrics.on_game_start();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
    }
}
