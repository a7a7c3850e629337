/// Mean with its standard error.
pub struct StdErr<T> {
    pub n: T,
    pub s: T,
}

impl std::fmt::Display for StdErr<f64> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.s <= 0.0 || !self.s.is_finite() {
            return write!(f, "{}", self.n);
        }
        // two significant figures of the error
        let exponent = self.s.log10().floor() as i32;
        let scale = 10f64.powi(1 - exponent);
        write!(
            f,
            "({:.1}pm{:.1})e{}",
            (self.n * scale).round() / 10.0,
            (self.s * scale).round() / 10.0,
            exponent
        )
    }
}

// https://en.wikipedia.org/wiki/Standard_deviation#Rapid_calculation_methods
#[derive(Default)]
pub struct RollingStdErr {
    sum: f64,
    sum_of_squares: f64,
    n: usize,
}

impl RollingStdErr {
    pub fn insert(&mut self, value: f64) {
        self.sum += value;
        self.sum_of_squares += value * value;
        self.n += 1;
    }

    pub fn avg(&self) -> StdErr<f64> {
        if self.n == 0 {
            return StdErr { n: 0.0, s: 0.0 };
        }

        let n = self.n as f64;
        let avg = self.sum / n;
        let sigma = (n * self.sum_of_squares - self.sum * self.sum).max(0.0).sqrt() / n;
        StdErr {
            n: avg,
            s: sigma / n.sqrt(),
        }
    }
}
