use core::fmt::Display;
use core::time::Duration;
use hashbrown::HashMap;

/// Accumulated durations of every dispatch name seen since the last summary.
#[derive(Debug, Default)]
pub struct Profiled {
    durations: HashMap<String, ProfileItem>,
}

#[derive(Debug, Default, Clone)]
struct ProfileItem {
    total_duration: Duration,
    num_dispatched: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Control the amount of info being displayed when profiling.
pub enum ProfileLevel {
    /// Only the summary table is logged.
    Basic,
    /// Every dispatch is logged with its duration, plus the summary table.
    Medium,
    /// Every dispatch is logged with its duration and full type name, plus the summary table.
    Full,
}

impl Profiled {
    /// If some dispatch was profiled.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Record one more run of `name`. Only the first line of the name is kept.
    pub fn update(&mut self, name: &str, duration: Duration) {
        let name = name.lines().next().unwrap_or(name);
        let item = self.durations.entry_ref(name).or_default();
        item.total_duration += duration;
        item.num_dispatched += 1;
    }

    /// Number of runs recorded for `name`.
    pub fn count(&self, name: &str) -> usize {
        self.durations
            .get(name)
            .map(|item| item.num_dispatched)
            .unwrap_or(0)
    }
}

const COLUMNS: [&str; 4] = ["Name", "Duration", "Num Dispatched", "Ratio"];

impl Display for Profiled {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut entries: Vec<(&String, &ProfileItem)> = self.durations.iter().collect();
        // Longest first, ties by name.
        entries.sort_by(|(name_a, a), (name_b, b)| {
            b.total_duration
                .cmp(&a.total_duration)
                .then_with(|| name_a.cmp(name_b))
        });

        let total: Duration = entries.iter().map(|(_, item)| item.total_duration).sum();
        let total_num: usize = entries.iter().map(|(_, item)| item.num_dispatched).sum();
        let total_micros = total.as_micros().max(1);

        let rows: Vec<[String; 4]> = entries
            .iter()
            .map(|(name, item)| {
                [
                    name.to_string(),
                    format!("{:?}", item.total_duration),
                    item.num_dispatched.to_string(),
                    format!("{} %", 100 * item.total_duration.as_micros() / total_micros),
                ]
            })
            .collect();
        let footer = [
            "Total".to_string(),
            format!("{total:?}"),
            total_num.to_string(),
            "100 %".to_string(),
        ];

        let mut widths = COLUMNS.map(str::len);
        for row in rows.iter().chain(core::iter::once(&footer)) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let rule_len = widths.iter().sum::<usize>() + 3 * widths.len() - 1;
        let rule = |f: &mut core::fmt::Formatter<'_>, c: &str| writeln!(f, "|{}|", c.repeat(rule_len));
        let row = |f: &mut core::fmt::Formatter<'_>, cells: &[&str]| {
            write!(f, "|")?;
            for (cell, width) in cells.iter().zip(widths) {
                write!(f, " {cell:<width$} |")?;
            }
            writeln!(f)
        };

        rule(f, "⎺")?;
        row(f, &COLUMNS)?;
        rule(f, "⎼")?;
        for cells in &rows {
            row(f, &cells.each_ref().map(String::as_str))?;
        }
        rule(f, "⎼")?;
        row(f, &footer.each_ref().map(String::as_str))?;
        rule(f, "⎯")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_names_are_grouped_by_first_line() {
        let mut profiled = Profiled::default();
        profiled.update("ChainedScanKernel\ncubes: 4", Duration::from_micros(10));
        profiled.update("ChainedScanKernel\ncubes: 8", Duration::from_micros(30));

        assert_eq!(profiled.count("ChainedScanKernel"), 2);
    }

    #[test]
    fn summary_lists_every_name() {
        let mut profiled = Profiled::default();
        profiled.update("DigitHistogramKernel", Duration::from_micros(10));
        profiled.update("OnesweepPassKernel", Duration::from_micros(30));

        let table = profiled.to_string();

        assert!(table.contains("DigitHistogramKernel"));
        assert!(table.contains("OnesweepPassKernel"));
        assert!(table.contains("Total"));
    }
}
