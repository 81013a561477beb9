use crate::time::TimeSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardLayout {
    /// Large `HH:MM`, seconds below.
    Stacked,
    /// `HH:MM:SS` with a sub-second progress bar.
    Inline,
    /// `h:MM` with AM/PM.
    TwelveHour,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandardVisual {
    pub layout: StandardLayout,
    pub primary: String,
    pub secondary: Option<String>,
    /// Fill of the millisecond bar (inline layout only).
    pub progress: Option<f32>,
    /// Variable font weights: seconds grow 400→900 over the minute, hours
    /// 500→900 over the hour.
    pub seconds_weight: f32,
    pub hour_weight: f32,
}

impl StandardVisual {
    pub fn headline(&self) -> String {
        match &self.secondary {
            Some(s) => format!("{} {}", self.primary, s),
            None => self.primary.clone(),
        }
    }
}

pub fn render(t: &TimeSample, variant: usize) -> StandardVisual {
    let seconds_weight = 400.0 + t.second as f32 / 60.0 * 500.0;
    let hour_weight = 500.0 + t.minute as f32 / 60.0 * 400.0;
    let (layout, primary, secondary, progress) = match variant {
        0 => (
            StandardLayout::Stacked,
            format!("{:02}:{:02}", t.hour, t.minute),
            Some(format!("{:02}", t.second)),
            None,
        ),
        1 => (
            StandardLayout::Inline,
            format!("{:02}:{:02}:{:02}", t.hour, t.minute, t.second),
            None,
            Some(t.millisecond as f32 / 1000.0),
        ),
        _ => {
            let h12 = match t.hour {
                0 => 12,
                h if h > 12 => h - 12,
                h => h,
            };
            let meridiem = if t.hour < 12 { "AM" } else { "PM" };
            (
                StandardLayout::TwelveHour,
                format!("{}:{:02}", h12, t.minute),
                Some(meridiem.to_string()),
                None,
            )
        }
    };
    StandardVisual {
        layout,
        primary,
        secondary,
        progress,
        seconds_weight,
        hour_weight,
    }
}
