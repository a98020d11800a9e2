//! Peer-group resolution.
//!
//! Two fallback policies coexist:
//! - hierarchical: tier × sector × industry, falling back once to tier × sector
//! - percentile: industry, then sector, then the whole universe

use crate::types::{MarketCapCategory, PeerLevel, StockRecord};
use std::collections::{BTreeMap, HashMap};

/// Stocks compared against each other, by index into the scored universe.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerGroup {
    pub level: PeerLevel,
    pub label: String,
    pub members: Vec<usize>,
}

impl PeerGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of hierarchical resolution over a universe.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalGrouping {
    pub groups: Vec<PeerGroup>,
    /// Index into `groups` for every stock; `None` when tier, sector or
    /// industry is missing.
    pub assignments: Vec<Option<usize>>,
}

impl HierarchicalGrouping {
    pub fn group_of(&self, stock_idx: usize) -> Option<&PeerGroup> {
        self.assignments
            .get(stock_idx)
            .copied()
            .flatten()
            .map(|g| &self.groups[g])
    }
}

/// Tier × sector × industry grouping with a single sector-level fallback.
#[derive(Debug, Clone, Copy)]
pub struct HierarchicalStrategy {
    /// Industry intersections smaller than this fall back to tier × sector
    pub min_industry_members: usize,
}

impl Default for HierarchicalStrategy {
    fn default() -> Self {
        Self {
            min_industry_members: 2,
        }
    }
}

impl HierarchicalStrategy {
    /// Resolve every stock's peer group.
    ///
    /// The fallback is two-level only: a sector group is used however small
    /// it is. Sector groups include members whose industry is missing, but
    /// those members are never assigned a group themselves.
    pub fn resolve(
        &self,
        stocks: &[StockRecord],
        categories: &[Option<MarketCapCategory>],
    ) -> HierarchicalGrouping {
        let mut by_sector: BTreeMap<(MarketCapCategory, &str), Vec<usize>> = BTreeMap::new();
        let mut by_industry: BTreeMap<(MarketCapCategory, &str, &str), Vec<usize>> = BTreeMap::new();

        for (idx, stock) in stocks.iter().enumerate() {
            let (Some(cat), Some(sector)) = (categories.get(idx).copied().flatten(), stock.sector.as_deref())
            else {
                continue;
            };
            by_sector.entry((cat, sector)).or_default().push(idx);
            if let Some(industry) = stock.industry.as_deref() {
                by_industry.entry((cat, sector, industry)).or_default().push(idx);
            }
        }

        let mut grouping = HierarchicalGrouping {
            groups: Vec::new(),
            assignments: vec![None; stocks.len()],
        };
        let mut sector_group_ids: HashMap<(MarketCapCategory, &str), usize> = HashMap::new();

        for ((cat, sector, industry), members) in by_industry {
            let group_id = if members.len() >= self.min_industry_members {
                grouping.groups.push(PeerGroup {
                    level: PeerLevel::Industry,
                    label: format!("{} / {} / {}", cat, sector, industry),
                    members: members.clone(),
                });
                grouping.groups.len() - 1
            } else {
                *sector_group_ids.entry((cat, sector)).or_insert_with(|| {
                    grouping.groups.push(PeerGroup {
                        level: PeerLevel::Sector,
                        label: format!("{} / {}", cat, sector),
                        members: by_sector[&(cat, sector)].clone(),
                    });
                    grouping.groups.len() - 1
                })
            };
            for idx in members {
                grouping.assignments[idx] = Some(group_id);
            }
        }

        tracing::info!(
            "Hierarchical peer groups: {} industry-level, {} sector-level, {} stocks ungrouped",
            grouping.groups.iter().filter(|g| g.level == PeerLevel::Industry).count(),
            grouping.groups.iter().filter(|g| g.level == PeerLevel::Sector).count(),
            grouping.assignments.iter().filter(|a| a.is_none()).count()
        );

        grouping
    }
}

/// Industry → sector → all fallback with a minimum member count.
#[derive(Debug, Clone, Copy)]
pub struct PercentileStrategy {
    pub min_peers: usize,
}

impl Default for PercentileStrategy {
    fn default() -> Self {
        Self { min_peers: 5 }
    }
}

impl PercentileStrategy {
    /// Index the universe once so each stock resolves in constant time.
    pub fn index<'a>(&self, stocks: &'a [StockRecord]) -> PercentileIndex<'a> {
        let mut by_industry: HashMap<&'a str, Vec<usize>> = HashMap::new();
        let mut by_sector: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, stock) in stocks.iter().enumerate() {
            if let Some(industry) = stock.industry.as_deref() {
                by_industry.entry(industry).or_default().push(idx);
            }
            if let Some(sector) = stock.sector.as_deref() {
                by_sector.entry(sector).or_default().push(idx);
            }
        }
        PercentileIndex {
            by_industry,
            by_sector,
            all: (0..stocks.len()).collect(),
            min_peers: self.min_peers,
        }
    }
}

/// Lookup structure built by [`PercentileStrategy::index`].
#[derive(Debug, Clone)]
pub struct PercentileIndex<'a> {
    by_industry: HashMap<&'a str, Vec<usize>>,
    by_sector: HashMap<&'a str, Vec<usize>>,
    all: Vec<usize>,
    min_peers: usize,
}

impl<'a> PercentileIndex<'a> {
    /// Peer indices and the level they were resolved at.
    pub fn resolve(&self, stock: &StockRecord) -> (PeerLevel, &[usize]) {
        if let Some(peers) = stock
            .industry
            .as_deref()
            .and_then(|i| self.by_industry.get(i))
            .filter(|p| p.len() >= self.min_peers)
        {
            return (PeerLevel::Industry, peers.as_slice());
        }
        if let Some(peers) = stock
            .sector
            .as_deref()
            .and_then(|s| self.by_sector.get(s))
            .filter(|p| p.len() >= self.min_peers)
        {
            return (PeerLevel::Sector, peers.as_slice());
        }
        (PeerLevel::All, self.all.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(symbol: &str, sector: Option<&str>, industry: Option<&str>) -> StockRecord {
        let mut s = StockRecord::new(symbol);
        s.sector = sector.map(String::from);
        s.industry = industry.map(String::from);
        s
    }

    #[test]
    fn test_hierarchical_uses_industry_when_two_members() {
        let stocks = vec![
            stock("A", Some("Tech"), Some("Software")),
            stock("B", Some("Tech"), Some("Software")),
            stock("C", Some("Tech"), Some("Hardware")),
        ];
        let cats = vec![Some(MarketCapCategory::LargeCap); 3];
        let grouping = HierarchicalStrategy::default().resolve(&stocks, &cats);

        let a = grouping.group_of(0).unwrap();
        assert_eq!(a.level, PeerLevel::Industry);
        assert_eq!(a.members, vec![0, 1]);

        let c = grouping.group_of(2).unwrap();
        assert_eq!(c.level, PeerLevel::Sector);
        assert_eq!(c.members, vec![0, 1, 2]);
    }

    #[test]
    fn test_hierarchical_skips_incomplete_classification() {
        let stocks = vec![
            stock("A", Some("Tech"), None),
            stock("B", None, Some("Software")),
            stock("C", Some("Tech"), Some("Software")),
        ];
        let cats = vec![
            Some(MarketCapCategory::MidCap),
            Some(MarketCapCategory::MidCap),
            None,
        ];
        let grouping = HierarchicalStrategy::default().resolve(&stocks, &cats);
        assert!(grouping.assignments.iter().all(|a| a.is_none()));
        assert!(grouping.groups.is_empty());
    }

    #[test]
    fn test_hierarchical_sector_group_includes_null_industry_peers() {
        let stocks = vec![
            stock("A", Some("Energy"), Some("Oil")),
            stock("B", Some("Energy"), None),
        ];
        let cats = vec![Some(MarketCapCategory::SmallCap); 2];
        let grouping = HierarchicalStrategy::default().resolve(&stocks, &cats);
        assert_eq!(grouping.group_of(0).unwrap().members, vec![0, 1]);
        assert!(grouping.group_of(1).is_none());
    }

    #[test]
    fn test_hierarchical_respects_tier_boundaries() {
        let stocks = vec![
            stock("A", Some("Tech"), Some("Software")),
            stock("B", Some("Tech"), Some("Software")),
        ];
        let cats = vec![Some(MarketCapCategory::LargeCap), Some(MarketCapCategory::MidCap)];
        let grouping = HierarchicalStrategy::default().resolve(&stocks, &cats);
        // Each is alone in its tier's industry, so both fall back to their own sector group
        assert_eq!(grouping.group_of(0).unwrap().members, vec![0]);
        assert_eq!(grouping.group_of(1).unwrap().members, vec![1]);
        assert_eq!(grouping.group_of(0).unwrap().level, PeerLevel::Sector);
    }

    #[test]
    fn test_percentile_falls_back_to_all() {
        let mut stocks = vec![stock("LONE", Some("Utilities"), Some("Water"))];
        for i in 0..3 {
            stocks.push(stock(&format!("U{}", i), Some("Utilities"), Some("Electric")));
        }
        for i in 0..6 {
            stocks.push(stock(&format!("T{}", i), Some("Tech"), Some("Software")));
        }
        let index = PercentileStrategy::default().index(&stocks);

        let (level, peers) = index.resolve(&stocks[0]);
        assert_eq!(level, PeerLevel::All);
        assert_eq!(peers.len(), stocks.len());

        let (level, peers) = index.resolve(&stocks[4]);
        assert_eq!(level, PeerLevel::Industry);
        assert_eq!(peers.len(), 6);
    }

    #[test]
    fn test_percentile_falls_back_to_sector() {
        let mut stocks = vec![stock("X", Some("Health"), Some("Biotech"))];
        for i in 0..4 {
            stocks.push(stock(&format!("H{}", i), Some("Health"), Some("Pharma")));
        }
        let index = PercentileStrategy::default().index(&stocks);
        let (level, peers) = index.resolve(&stocks[0]);
        assert_eq!(level, PeerLevel::Sector);
        assert_eq!(peers.len(), 5);
    }

    #[test]
    fn test_percentile_missing_classification_uses_all() {
        let stocks = vec![stock("N", None, None), stock("M", None, None)];
        let index = PercentileStrategy::default().index(&stocks);
        assert_eq!(index.resolve(&stocks[0]).0, PeerLevel::All);
    }
}
