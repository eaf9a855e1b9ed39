use super::interval::{merge_intervals, Interval, Span};
use super::{intervals_by_layer, Record};
use log::debug;
use std::collections::BTreeMap;

/// Uncovered ranges of each layer.
///
/// Gaps are measured against the extent of the whole dataset, from the
/// smallest start to the largest end over all layers, not against the
/// layer's own extent.
pub fn find_gaps_per_layer(records: &[Record]) -> BTreeMap<String, Vec<Span>> {
    let valid = || records.iter().filter(|x| x.is_valid());
    let (min_start, max_end) = match (
        valid().map(|x| x.start).min(),
        valid().map(|x| x.end).max(),
    ) {
        (Some(min_start), Some(max_end)) => (min_start, max_end),
        _ => return BTreeMap::new(),
    };

    let mut result = BTreeMap::new();
    for (layer, intervals) in intervals_by_layer(records) {
        let mut gaps = Vec::new();
        let mut pos = min_start;
        for one in merge_intervals(&intervals) {
            if pos < one.start {
                gaps.push(Span::from(Interval::new(pos, one.start)));
            }
            pos = pos.max(one.end);
        }
        if pos < max_end {
            gaps.push(Span::from(Interval::new(pos, max_end)));
        }
        debug!("{}: {} gaps", layer, gaps.len());
        result.insert(layer.to_string(), gaps);
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gaps() {
        let records = vec![
            Record::new("L", 100, 150),
            Record::new("L", 600, 800),
            Record::new("L", 1400, 1600),
        ];
        let gaps = find_gaps_per_layer(&records);
        assert_eq!(
            gaps["L"],
            vec![
                Span {
                    start: 150,
                    end: 600,
                    len: 450
                },
                Span {
                    start: 800,
                    end: 1400,
                    len: 600
                }
            ]
        );
    }

    #[test]
    fn test_gaps_use_dataset_extent() {
        let records = vec![
            Record::new("A", 0, 1000),
            Record::new("B", 200, 300),
            Record::new("B", 250, 500),
        ];
        let gaps = find_gaps_per_layer(&records);
        assert!(gaps["A"].is_empty());
        assert_eq!(
            gaps["B"],
            vec![
                Span {
                    start: 0,
                    end: 200,
                    len: 200
                },
                Span {
                    start: 500,
                    end: 1000,
                    len: 500
                }
            ]
        );
    }

    #[test]
    fn test_gaps_empty() {
        assert!(find_gaps_per_layer(&[]).is_empty());
        assert!(find_gaps_per_layer(&[Record::new("L", 10, 5)]).is_empty());
    }

    #[test]
    fn test_gaps_complement_coverage() {
        let records = vec![
            Record::new("A", 50, 120),
            Record::new("A", 300, 700),
            Record::new("A", 650, 900),
            Record::new("B", 0, 30),
            Record::new("B", 2000, 2500),
        ];
        let gaps = find_gaps_per_layer(&records);
        let coverage: Vec<_> = records
            .iter()
            .filter(|x| x.layer == "A")
            .map(|x| x.interval())
            .collect();

        let mut tiles: Vec<Interval> = merge_intervals(&coverage);
        tiles.extend(gaps["A"].iter().map(|x| Interval::new(x.start, x.end)));
        tiles.sort();
        assert_eq!(tiles.first().map(|x| x.start), Some(0));
        assert_eq!(tiles.last().map(|x| x.end), Some(2500));
        for pair in tiles.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
