use super::Record;
use serde::Serialize;
use std::collections::BTreeSet;

/// Width of one display row, in meters.
pub const CHUNK_SIZE: u64 = 1000;

/// Part of a stretch falling into a single chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub chunk_start: u64,
    pub chunk_label: String,
    pub layer: String,
    pub rel_start: u64,
    pub rel_end: u64,
    pub abs_start: u64,
    pub abs_end: u64,
}

impl Segment {
    pub fn len(&self) -> u64 {
        self.abs_end - self.abs_start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StretchSegments {
    pub chunk_size: u64,
    pub segments: Vec<Segment>,
    pub layers: Vec<String>,
    pub chunks: Vec<u64>,
}

impl StretchSegments {
    pub fn chunk_label(&self, chunk_start: u64) -> String {
        chunk_label(chunk_start, self.chunk_size)
    }
}

fn chunk_label(chunk_start: u64, chunk_size: u64) -> String {
    format!("{}-{}", chunk_start, chunk_start.saturating_add(chunk_size))
}

pub fn build_stretch_segments(records: &[Record]) -> StretchSegments {
    build_stretch_segments_with_chunk_size(records, CHUNK_SIZE)
}

/// Splits every stretch at multiples of `chunk_size`.
///
/// Each chunk a stretch touches, from the chunk holding its start to the
/// chunk holding its end, is listed in `chunks`, even when the stretch ends
/// exactly on that chunk's boundary and yields no segment there. Segments
/// are sorted by chunk, layer and relative start.
pub fn build_stretch_segments_with_chunk_size(
    records: &[Record],
    chunk_size: u64,
) -> StretchSegments {
    let chunk_size = chunk_size.max(1);
    let mut segments = Vec::new();
    let mut layers = BTreeSet::new();
    let mut chunks = BTreeSet::new();

    for one in records.iter().filter(|x| x.is_valid()) {
        layers.insert(one.layer.as_str());
        let first_chunk = one.start / chunk_size * chunk_size;
        let last_chunk = one.end / chunk_size * chunk_size;
        for chunk_start in (first_chunk..=last_chunk).step_by(chunk_size as usize) {
            chunks.insert(chunk_start);
            let seg_start = one.start.max(chunk_start);
            let seg_end = one.end.min(chunk_start.saturating_add(chunk_size));
            if seg_start < seg_end {
                segments.push(Segment {
                    chunk_start,
                    chunk_label: chunk_label(chunk_start, chunk_size),
                    layer: one.layer.clone(),
                    rel_start: seg_start - chunk_start,
                    rel_end: seg_end - chunk_start,
                    abs_start: seg_start,
                    abs_end: seg_end,
                });
            }
        }
    }

    segments.sort_by(|a, b| {
        (a.chunk_start, &a.layer, a.rel_start).cmp(&(b.chunk_start, &b.layer, b.rel_start))
    });

    StretchSegments {
        chunk_size,
        segments,
        layers: layers.into_iter().map(|x| x.to_string()).collect(),
        chunks: chunks.into_iter().collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_single_chunk() {
        let result = build_stretch_segments(&[Record::new("Subgrade", 100, 150)]);
        assert_eq!(result.layers, vec!["Subgrade".to_string()]);
        assert_eq!(result.chunks, vec![0]);
        assert_eq!(
            result.segments,
            vec![Segment {
                chunk_start: 0,
                chunk_label: "0-1000".to_string(),
                layer: "Subgrade".to_string(),
                rel_start: 100,
                rel_end: 150,
                abs_start: 100,
                abs_end: 150,
            }]
        );
    }

    #[test]
    fn test_split_at_chunk_boundaries() {
        let result = build_stretch_segments(&[Record::new("L", 800, 3200)]);
        assert_eq!(result.chunks, vec![0, 1000, 2000, 3000]);
        let ranges: Vec<_> = result
            .segments
            .iter()
            .map(|x| (x.chunk_start, x.rel_start, x.rel_end, x.abs_start, x.abs_end))
            .collect();
        assert_eq!(
            ranges,
            vec![
                (0, 800, 1000, 800, 1000),
                (1000, 0, 1000, 1000, 2000),
                (2000, 0, 1000, 2000, 3000),
                (3000, 0, 200, 3000, 3200),
            ]
        );
        assert_eq!(result.segments.iter().map(|x| x.len()).sum::<u64>(), 2400);
        assert_eq!(result.chunk_label(2000), "2000-3000");
    }

    #[test]
    fn test_end_on_boundary() {
        let result = build_stretch_segments(&[Record::new("L", 1400, 2000)]);
        assert_eq!(result.chunks, vec![1000, 2000]);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].rel_start, 400);
        assert_eq!(result.segments[0].rel_end, 1000);
    }

    #[test]
    fn test_sort_order() {
        let result = build_stretch_segments(&[
            Record::new("Subgrade", 1400, 1600),
            Record::new("Subgrade", 600, 800),
            Record::new("Embankment EW", 900, 1100),
            Record::new("Subgrade", 100, 150),
            Record::new("Broken", 500, 400),
        ]);
        assert_eq!(
            result.layers,
            vec!["Embankment EW".to_string(), "Subgrade".to_string()]
        );
        assert_eq!(result.chunks, vec![0, 1000]);
        let order: Vec<_> = result
            .segments
            .iter()
            .map(|x| (x.chunk_start, x.layer.as_str(), x.rel_start))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "Embankment EW", 900),
                (0, "Subgrade", 100),
                (0, "Subgrade", 600),
                (1000, "Embankment EW", 0),
                (1000, "Subgrade", 400),
            ]
        );
    }

    #[test]
    fn test_custom_chunk_size() {
        let result = build_stretch_segments_with_chunk_size(&[Record::new("L", 250, 750)], 500);
        assert_eq!(result.chunks, vec![0, 500]);
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[1].chunk_label, "500-1000");
        assert_eq!(result.segments[1].rel_end, 250);
    }

    #[test]
    fn test_stretch_at_end_of_range() {
        let result = build_stretch_segments(&[Record::new("L", u64::MAX - 10, u64::MAX)]);
        let chunk_start = u64::MAX / CHUNK_SIZE * CHUNK_SIZE;
        assert_eq!(result.chunks, vec![chunk_start]);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].abs_start, u64::MAX - 10);
        assert_eq!(result.segments[0].abs_end, u64::MAX);
        assert_eq!(result.segments[0].len(), 10);
        assert_eq!(
            result.chunk_label(chunk_start),
            format!("{}-{}", chunk_start, u64::MAX)
        );
    }
}
