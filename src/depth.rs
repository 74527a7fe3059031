#[allow(unused_imports)]
use crate::Llrb;

// Leaf depth of an LLRB stays under 2*log2(n), 256 buckets is plenty
// for any tree that fits in memory.
const MAX_DEPTH: usize = 256;

/// Depth calculates minimum, maximum, average and percentile of leaf-node
/// depths in the [`Llrb`] tree. Here a leaf is an empty child position,
/// so `max()` is the height of the tree.
#[derive(Clone, Debug)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    depths: [u64; MAX_DEPTH],
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        let depth = depth.min(MAX_DEPTH - 1);
        if self.samples == 0 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
        self.samples += 1;
        self.total += depth;
        self.depths[depth] += 1;
    }

    /// Return number of empty child positions sampled in [`Llrb`] instance.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Return minimum depth of leaf-node in [`Llrb`] instance.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Return maximum depth of leaf-node, the height of [`Llrb`] instance.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average depth of leaf-nodes in [`Llrb`] instance.
    pub fn mean(&self) -> usize {
        match self.samples {
            0 => 0,
            samples => self.total / samples,
        }
    }

    /// Return depth as tuple of percentiles, each tuple provides
    /// (percentile, depth). Returned percentiles from 90, 91 .. 99
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut percentiles: Vec<(u8, usize)> = vec![];
        if self.samples == 0 {
            return percentiles;
        }
        let (mut acc, mut prev_perc) = (0_u64, 90_u8);
        let iter = self.depths.iter().enumerate().filter(|(_, &n)| n > 0);
        for (depth, samples) in iter {
            acc += *samples;
            let perc = ((acc as f64 / self.samples as f64) * 100_f64) as u8;
            if perc >= prev_perc {
                percentiles.push((perc, depth));
                prev_perc = perc;
            }
        }
        percentiles
    }

    /// Pretty print depth statistics in human readable format, useful in logs.
    pub fn pretty_print(&self, prefix: &str) {
        println!(
            "{}depth (min, avg, max): {:?}",
            prefix,
            (self.min, self.mean(), self.max)
        );
        for (perc, depth) in self.percentiles().into_iter() {
            println!("{}  {} percentile = {}", prefix, perc, depth);
        }
    }

    /// Convert depth statistics to JSON format, useful for plotting.
    pub fn json(&self) -> String {
        let ps: Vec<String> = self
            .percentiles()
            .into_iter()
            .map(|(p, d)| format!("\"{}\": {}", p, d))
            .collect();
        format!(
            "{{ \"min\": {}, \"mean\": {}, \"max\": {}, \"percentiles\": {{ {} }} }}",
            self.min,
            self.mean(),
            self.max,
            ps.join(", ")
        )
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth {
            samples: 0,
            min: 0,
            max: 0,
            total: 0,
            depths: [0; MAX_DEPTH],
        }
    }
}
