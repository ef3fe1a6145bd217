#[derive(Clone, Debug)]
pub struct FixedStepScheduler {
    step_seconds: f32,
    max_steps: usize,
    accumulator: f32,
}

impl FixedStepScheduler {
    pub fn new(rate_hz: f32, max_steps: usize) -> Self {
        Self {
            step_seconds: 1.0 / rate_hz.max(1.0),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) -> usize {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let owed = (self.accumulator / self.step_seconds).floor() as usize;
        let steps = owed.min(self.max_steps);
        self.accumulator -= steps as f32 * self.step_seconds;
        if owed > steps {
            self.accumulator = self.accumulator.min(self.step_seconds);
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
