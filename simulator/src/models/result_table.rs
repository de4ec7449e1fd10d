use super::sample::Sample;

/// Ordered, immutable collection of simulation trials.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    samples: Vec<Sample>,
}

impl ResultTable {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn illumination(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(Sample::illumination)
    }

    pub fn quality(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(Sample::quality)
    }

    pub fn effectiveness(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(Sample::effectiveness)
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Append-only builder; the only way a table grows.
#[derive(Debug, Default)]
pub struct ResultTableBuilder {
    samples: Vec<Sample>,
}

impl ResultTableBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Appends a partial table produced by another worker, keeping its order.
    pub fn append(&mut self, partial: Vec<Sample>) {
        self.samples.extend(partial);
    }

    pub fn finish(self) -> ResultTable {
        ResultTable {
            samples: self.samples,
        }
    }
}
