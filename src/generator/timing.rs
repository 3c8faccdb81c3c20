use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 时间跟踪作用域，按阶段开始的顺序记录耗时
#[derive(Debug, Clone)]
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .push((phase_name.to_string(), duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取某个阶段的执行时间
    pub fn get_phase_duration(&self, phase_name: &str) -> Option<Duration> {
        self.phase_durations
            .iter()
            .find(|(name, _)| name == phase_name)
            .map(|(_, duration)| *duration)
    }

    /// 获取所有已结束阶段的执行时间
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "Total time: {:.2}s\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\nStage timings:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}s\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const PLANNING: &'static str = "planning";
    pub const SEARCHING: &'static str = "searching";
    pub const WRITING: &'static str = "writing";
    pub const NOTIFYING: &'static str = "notifying";

    /// 获取所有阶段的键列表
    pub fn get_all_phase_keys() -> Vec<&'static str> {
        vec![
            Self::PLANNING,
            Self::SEARCHING,
            Self::WRITING,
            Self::NOTIFYING,
        ]
    }
}
