use crate::domain::payment::Processor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBucket {
    pub total_requests: i64,
    pub total_amount: f64,
}

/// Per-processor totals over a `requestedAt` window. Both buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentsSummary {
    pub default: SummaryBucket,
    pub fallback: SummaryBucket,
}

impl PaymentsSummary {
    /// Folds grouped `(processor, count, amount)` rows; processors without a row stay zeroed.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Processor, i64, f64)>,
    {
        let mut summary = Self::default();
        for (processor, total_requests, total_amount) in rows {
            let bucket = summary.bucket_mut(processor);
            bucket.total_requests += total_requests;
            bucket.total_amount += total_amount;
        }
        summary
    }

    pub fn bucket(&self, processor: Processor) -> &SummaryBucket {
        match processor {
            Processor::Default => &self.default,
            Processor::Fallback => &self.fallback,
        }
    }

    fn bucket_mut(&mut self, processor: Processor) -> &mut SummaryBucket {
        match processor {
            Processor::Default => &mut self.default,
            Processor::Fallback => &mut self.fallback,
        }
    }
}
