use log::debug;

pub use crate::config::*;

/// A builder for adding rating counts one at a time.
///
/// ```
/// pub use diverging_stack::builder::Builder;
/// pub use diverging_stack::Taxonomy;
/// # use diverging_stack::ChartErrors;
///
/// let mut builder = Builder::new(&Taxonomy::politifact())?;
///
/// builder.add_row("Anna", "pants-fire", 3.0)?;
/// builder.add_row("Anna", "true", 1.0)?;
/// builder.add_row("Anna", "full-flop", 7.0)?;
///
/// let data = builder.build()?;
/// assert_eq!(data.bias[0].bias, -0.75);
///
/// # Ok::<(), ChartErrors>(())
/// ```
pub struct Builder {
    pub(crate) _taxonomy: Taxonomy,
    pub(crate) _rows: Vec<RawRow>,
}

impl Builder {
    /// Fails if the taxonomy is not valid.
    pub fn new(taxonomy: &Taxonomy) -> Result<Builder, ChartErrors> {
        taxonomy.validate()?;
        Ok(Builder {
            _taxonomy: taxonomy.clone(),
            _rows: Vec::new(),
        })
    }

    /// Adds the number of statements of a speaker that received a given ruling.
    ///
    /// Rows with an unknown ruling are ignored, whatever their count.
    pub fn add_row(&mut self, speaker: &str, ruling: &str, count: f64) -> Result<(), ChartErrors> {
        self.add_raw_row(&RawRow {
            speaker: speaker.to_string(),
            ruling: ruling.to_string(),
            count,
        })
    }

    pub fn add_raw_row(&mut self, row: &RawRow) -> Result<(), ChartErrors> {
        if self._taxonomy.label(&row.ruling).is_none() {
            debug!("add_raw_row: ignoring ruling {:?}", row.ruling);
            return Ok(());
        }
        if !row.count.is_finite() || row.count < 0.0 {
            return Err(ChartErrors::InvalidCount {
                speaker: row.speaker.clone(),
                count: row.count,
            });
        }
        self._rows.push(row.clone());
        Ok(())
    }

    pub fn build(&self) -> Result<ChartData, ChartErrors> {
        crate::run_chart_stats(&self._rows, &self._taxonomy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_counts() {
        let mut b = Builder::new(&Taxonomy::politifact()).unwrap();
        assert!(b.add_row("Ann", "true", f64::NAN).is_err());
        assert!(b.add_row("Ann", "true", -2.0).is_err());
        assert_eq!(b.build(), Err(ChartErrors::EmptyChart));

        b.add_row("Ann", "full-flop", -2.0).unwrap();
        b.add_row("Ann", "true", 2.0).unwrap();
        assert_eq!(b.build().unwrap().records.len(), 1);
    }

    #[test]
    fn builds() {
        let mut b = Builder::new(&Taxonomy::politifact()).unwrap();
        b.add_row("Ann", "false", 1.0).unwrap();
        b.add_row("Bob", "true", 1.0).unwrap();
        let data = b.build().unwrap();
        let names: Vec<&str> = data.bias.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
    }
}
