/// One decoded result row: an ordered sequence of nullable text fields.
///
/// Every backend decodes into this shape so that operations can check the column count and
/// convert fields without caring which driver produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRow {
    /// The fields for this row, `None` for SQL NULL
    pub fields: Vec<Option<String>>,
}

impl TextRow {
    /// Create a row from already-decoded fields
    #[must_use]
    pub fn new(fields: Vec<Option<String>>) -> Self {
        Self { fields }
    }

    /// Number of columns in the row
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field by column index
    ///
    /// # Returns
    ///
    /// `None` if the index is out of bounds, `Some(None)` for a NULL field
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<Option<&str>> {
        self.fields.get(index).map(Option::as_deref)
    }

    /// Field text, with NULL and missing columns read as the empty string
    #[must_use]
    pub fn text(&self, index: usize) -> &str {
        self.get_by_index(index).flatten().unwrap_or("")
    }

    /// Owned field text, see [`TextRow::text`]
    #[must_use]
    pub fn string(&self, index: usize) -> String {
        self.text(index).to_string()
    }

    /// Field as an unsigned integer.
    ///
    /// NULL or unparseable text reads as 0; fractional text (an `AVG` column, say) truncates
    /// toward zero and negative values clamp to 0.
    #[must_use]
    pub fn u32(&self, index: usize) -> u32 {
        let text = self.text(index).trim();
        if let Ok(value) = text.parse::<u32>() {
            return value;
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => {
                if value >= f64::from(u32::MAX) {
                    u32::MAX
                } else {
                    value.trunc() as u32
                }
            }
            _ => 0,
        }
    }

    /// Field as a float; NULL or unparseable text reads as 0.0
    #[must_use]
    pub fn f64(&self, index: usize) -> f64 {
        self.text(index).trim().parse::<f64>().unwrap_or(0.0)
    }
}

impl From<Vec<Option<String>>> for TextRow {
    fn from(fields: Vec<Option<String>>) -> Self {
        Self::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[Option<&str>]) -> TextRow {
        TextRow::new(fields.iter().map(|f| f.map(str::to_string)).collect())
    }

    #[test]
    fn null_and_missing_fields_read_as_empty() {
        let r = row(&[Some("a"), None]);
        assert_eq!(r.len(), 2);
        assert_eq!(r.text(0), "a");
        assert_eq!(r.text(1), "");
        assert_eq!(r.text(7), "");
        assert_eq!(r.get_by_index(1), Some(None));
        assert_eq!(r.get_by_index(2), None);
    }

    #[test]
    fn numeric_accessors_follow_text_conversion_rules() {
        let r = row(&[Some("42"), Some("12.75"), None, Some("junk"), Some("-3"), Some("2.5")]);
        assert_eq!(r.u32(0), 42);
        assert_eq!(r.u32(1), 12);
        assert_eq!(r.u32(2), 0);
        assert_eq!(r.u32(3), 0);
        assert_eq!(r.u32(4), 0);
        assert!((r.f64(5) - 2.5).abs() < f64::EPSILON);
        assert!(r.f64(2).abs() < f64::EPSILON);
    }
}
