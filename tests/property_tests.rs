use ratingscope::data::NormalizedRecord;
use ratingscope::{top_n, CountTable, RatingBucketSet, YearSet};
use proptest::prelude::*;

// --- STRATEGIES ---

prop_compose! {
    fn arb_record()(
        year in 2010i32..2022,
        bucket in 0i32..10,
        popularity in prop_oneof![0.0..1e6f64, Just(100.0), Just(0.0)],
        name in "[A-Za-z ]{0,20}"
    ) -> NormalizedRecord {
        NormalizedRecord { id: 0, year, rating_bucket: bucket, popularity, name }
    }
}

fn arb_records() -> impl Strategy<Value = Vec<NormalizedRecord>> {
    proptest::collection::vec(arb_record(), 0..200).prop_map(|mut records| {
        for (i, r) in records.iter_mut().enumerate() {
            r.id = i;
        }
        records
    })
}

proptest! {
    #[test]
    fn count_table_sums_to_records_in_range(records in arb_records()) {
        let years = YearSet::observed(&records, 2015..=2019);
        let buckets = RatingBucketSet::from_records(&records);
        let table = CountTable::build(&records, &years, &buckets);

        let in_range = records.iter().filter(|r| (2015..=2019).contains(&r.year)).count() as u64;
        prop_assert_eq!(table.total(), in_range);
    }

    #[test]
    fn count_table_is_dense(records in arb_records()) {
        let years = YearSet::span(2015..=2019);
        let buckets = RatingBucketSet::from_records(&records);
        let table = CountTable::build(&records, &years, &buckets);

        for y in years.iter() {
            for b in buckets.iter() {
                prop_assert!(table.get(y, b).is_some());
            }
            prop_assert_eq!(table.row(y).map(|r| r.len()), Some(buckets.len()));
        }
    }

    #[test]
    fn domains_are_sorted_and_unique(records in arb_records()) {
        let years = YearSet::observed(&records, 2015..=2019);
        let buckets = RatingBucketSet::from_records(&records);

        prop_assert!(years.as_slice().windows(2).all(|w| w[0] < w[1]));
        prop_assert!(buckets.as_slice().windows(2).all(|w| w[0] < w[1]));
        for r in &records {
            prop_assert!(buckets.as_slice().contains(&r.rating_bucket));
            if (2015..=2019).contains(&r.year) {
                prop_assert!(years.contains(r.year));
            }
        }
    }

    #[test]
    fn top_n_is_bounded_sorted_and_dominant(
        records in arb_records(),
        year in 2010i32..2022,
        bucket in 0i32..10,
        n in 0usize..8
    ) {
        let result = top_n(&records, year, bucket, n);
        let matching: Vec<_> = records.iter().filter(|r| r.year == year && r.rating_bucket == bucket).collect();

        prop_assert_eq!(result.len(), n.min(matching.len()));
        prop_assert!(result.iter().all(|r| r.year == year && r.rating_bucket == bucket));
        prop_assert!(result.items.windows(2).all(|w| w[0].popularity >= w[1].popularity));

        // nothing left out beats anything kept
        if let Some(last) = result.items.last() {
            let kept: Vec<usize> = result.iter().map(|r| r.id).collect();
            for r in matching.iter().filter(|r| !kept.contains(&r.id)) {
                prop_assert!(r.popularity <= last.popularity);
            }
        }
    }

    #[test]
    fn top_n_is_deterministic_and_pure(records in arb_records(), year in 2010i32..2022, bucket in 0i32..10) {
        let before = records.clone();
        let a = top_n(&records, year, bucket, 5);
        let b = top_n(&records, year, bucket, 5);
        prop_assert_eq!(a, b);
        prop_assert_eq!(records, before);
    }
}
