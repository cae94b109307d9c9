/// Day totals split by transaction type and shift.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShiftTotals {
    pub delivered_morning: f64,
    pub delivered_afternoon: f64,
    pub paid_morning: f64,
    pub paid_afternoon: f64,
}

/// Day totals regardless of shift.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayTotals {
    pub delivered: f64,
    pub paid: f64,
}

impl ShiftTotals {
    pub fn delivered(&self) -> f64 {
        self.delivered_morning + self.delivered_afternoon
    }

    pub fn paid(&self) -> f64 {
        self.paid_morning + self.paid_afternoon
    }
}
