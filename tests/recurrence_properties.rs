//! Property-based tests for the recurrence generator.

use amenity_booking::models::recurrence::{Frequency, RecurrencePattern};
use amenity_booking::models::resource::DateRange;
use amenity_booking::services::recurrence::generate_dates;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2024-01-01 plus up to ~4 years
    (0i64..1500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn arb_range() -> impl Strategy<Value = DateRange> {
    (arb_date(), 0i64..400).prop_map(|(start, len)| {
        DateRange::new(start, start + Duration::days(len)).unwrap()
    })
}

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::BiWeekly),
        Just(Frequency::Monthly),
        Just(Frequency::Quarterly),
    ]
}

fn arb_weekdays() -> impl Strategy<Value = Vec<Weekday>> {
    let all = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    proptest::sample::subsequence(all.to_vec(), 1..=7)
}

proptest! {
    #[test]
    fn generated_dates_stay_inside_series_and_window(
        series in arb_range(),
        window in arb_range(),
        frequency in arb_frequency(),
        weekdays in arb_weekdays(),
    ) {
        let pattern = RecurrencePattern::new(frequency, weekdays);
        let dates = generate_dates(&pattern, &series, &window);

        for date in &dates {
            prop_assert!(series.contains(*date));
            prop_assert!(window.contains(*date));
        }
    }

    #[test]
    fn generated_dates_are_sorted_and_unique(
        series in arb_range(),
        window in arb_range(),
        frequency in arb_frequency(),
        weekdays in arb_weekdays(),
    ) {
        let pattern = RecurrencePattern::new(frequency, weekdays);
        let dates = generate_dates(&pattern, &series, &window);

        for pair in dates.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn weekly_dates_land_on_selected_weekdays(
        series in arb_range(),
        window in arb_range(),
        weekdays in arb_weekdays(),
    ) {
        let pattern = RecurrencePattern::new(Frequency::Weekly, weekdays.clone());
        let dates = generate_dates(&pattern, &series, &window);

        for date in &dates {
            prop_assert!(weekdays.contains(&date.weekday()));
        }
    }

    #[test]
    fn generation_is_deterministic(
        series in arb_range(),
        window in arb_range(),
        frequency in arb_frequency(),
        weekdays in arb_weekdays(),
    ) {
        let pattern = RecurrencePattern::new(frequency, weekdays);
        let first = generate_dates(&pattern, &series, &window);
        let second = generate_dates(&pattern, &series, &window);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn biweekly_phase_is_anchored_at_the_series_start(
        series in arb_range(),
        window in arb_range(),
        weekdays in arb_weekdays(),
    ) {
        let pattern = RecurrencePattern::new(Frequency::BiWeekly, weekdays);

        // every emitted date sits a whole number of 14-day steps after the
        // first occurrence of its weekday on or after the series start,
        // regardless of where the window begins
        let dates = generate_dates(&pattern, &series, &window);
        for date in &dates {
            let mut anchor = series.start;
            while anchor.weekday() != date.weekday() {
                anchor += Duration::days(1);
            }
            let gap = (*date - anchor).num_days();
            prop_assert_eq!(gap % 14, 0, "date {} off-phase from anchor {}", date, anchor);
        }
    }

    #[test]
    fn daily_with_all_weekdays_covers_the_whole_intersection(
        series in arb_range(),
        window in arb_range(),
    ) {
        let pattern = RecurrencePattern::new(Frequency::Daily, vec![]);
        let dates = generate_dates(&pattern, &series, &window);

        let expected = match series.intersect(&window) {
            Some(overlap) => (overlap.end - overlap.start).num_days() + 1,
            None => 0,
        };
        prop_assert_eq!(dates.len() as i64, expected);
    }
}
