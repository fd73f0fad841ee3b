//! The standard earthquake analysis menu.
//!
//! Menu numbers are part of the labels users know; gaps are intentional.

use super::dialect::{count_where, DatePart, SqlDialect};
use super::{QueryDefinition, QueryShape};

const SHALLOW: &str = "depth_km < 70";
const NOT_SHALLOW: &str = "depth_km >= 70";

pub(super) fn standard_entries(
    table: &str,
    since_year: i32,
    dialect: SqlDialect,
) -> Vec<QueryDefinition> {
    let t = table;
    let year = dialect.date_part(DatePart::Year, "time");
    let month = dialect.date_part(DatePart::Month, "time");
    let weekday = dialect.date_part(DatePart::DayOfWeek, "time");
    let hour = dialect.date_part(DatePart::Hour, "time");
    let time = dialect.as_text("time");
    let avg_mag = dialect.as_float("AVG(mag)");

    vec![
        QueryDefinition::new(
            "1. Top 10 Strongest Earthquakes",
            QueryShape::TopN,
            format!("SELECT place, mag, {time} AS time FROM {t} ORDER BY mag DESC LIMIT 10"),
        )
        .with_row_limit(10),
        QueryDefinition::new(
            "2. Top 10 Deepest Earthquakes",
            QueryShape::TopN,
            format!(
                "SELECT place, depth_km, {time} AS time FROM {t} ORDER BY depth_km DESC LIMIT 10"
            ),
        )
        .with_row_limit(10),
        QueryDefinition::new(
            "3. Shallow & Powerful (Depth < 50km, Mag > 7.5)",
            QueryShape::FilteredTopN,
            format!(
                "SELECT place, mag, depth_km, {time} AS time FROM {t} \
                 WHERE depth_km < 50 AND mag > 7.5 ORDER BY mag DESC LIMIT 10"
            ),
        )
        .with_row_limit(10),
        QueryDefinition::new(
            "5. Avg Magnitude per Type",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT mag_type, {avg_mag} AS avg_mag FROM {t} GROUP BY mag_type ORDER BY mag_type"
            ),
        ),
        QueryDefinition::new(
            "6. Year with most earthquakes",
            QueryShape::GroupedRanked,
            format!(
                "SELECT {year} AS yr, COUNT(*) AS quakes FROM {t} GROUP BY {year} \
                 ORDER BY quakes DESC, yr LIMIT 1"
            ),
        )
        .with_row_limit(1),
        QueryDefinition::new(
            "7. Month with most earthquakes",
            QueryShape::GroupedRanked,
            format!(
                "SELECT {month} AS mon, COUNT(*) AS quakes FROM {t} GROUP BY {month} \
                 ORDER BY quakes DESC, mon LIMIT 1"
            ),
        )
        .with_row_limit(1),
        QueryDefinition::new(
            "8. Day of week with most earthquakes",
            QueryShape::GroupedRanked,
            format!(
                "SELECT {weekday} AS day_of_week, COUNT(*) AS quakes FROM {t} GROUP BY {weekday} \
                 ORDER BY quakes DESC, day_of_week LIMIT 1"
            ),
        )
        .with_row_limit(1),
        QueryDefinition::new(
            "9. Earthquakes per Hour of Day",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT {hour} AS hour_of_day, COUNT(*) AS quakes FROM {t} GROUP BY {hour} \
                 ORDER BY hour_of_day"
            ),
        ),
        QueryDefinition::new(
            "10. Most active reporting network",
            QueryShape::GroupedRanked,
            format!(
                "SELECT net, COUNT(*) AS quakes FROM {t} GROUP BY net \
                 ORDER BY quakes DESC, net LIMIT 1"
            ),
        )
        .with_row_limit(1),
        QueryDefinition::new(
            "11. Top 5 places by significance (Impact)",
            QueryShape::TopN,
            format!("SELECT place, sig FROM {t} ORDER BY sig DESC LIMIT 5"),
        )
        .with_row_limit(5),
        QueryDefinition::new(
            "12. Total impact (sig) per continent",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT place, SUM(sig) AS total_sig FROM {t} GROUP BY place \
                 ORDER BY total_sig DESC, place"
            ),
        ),
        QueryDefinition::new(
            "13. Avg significance by alert level",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT alert, {} AS avg_sig FROM {t} WHERE alert IS NOT NULL \
                 GROUP BY alert ORDER BY alert",
                dialect.as_float("AVG(sig)")
            ),
        ),
        QueryDefinition::new(
            "14. Reviewed vs Automatic Status",
            QueryShape::GroupedAggregate,
            format!("SELECT status, COUNT(*) AS total FROM {t} GROUP BY status ORDER BY status"),
        ),
        QueryDefinition::new(
            "15. Count by event type",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT type, COUNT(*) AS quakes FROM {t} GROUP BY type ORDER BY quakes DESC, type"
            ),
        ),
        QueryDefinition::new(
            "16. Top data types (types column)",
            QueryShape::GroupedRanked,
            format!(
                "SELECT types, COUNT(*) AS quakes FROM {t} GROUP BY types \
                 ORDER BY quakes DESC, types LIMIT 5"
            ),
        )
        .with_row_limit(5),
        QueryDefinition::new(
            "17. Avg RMS and Gap per continent",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT place, {} AS avg_rms, {} AS avg_gap FROM {t} GROUP BY place ORDER BY place",
                dialect.as_float("AVG(rms)"),
                dialect.as_float("AVG(gap)")
            ),
        ),
        QueryDefinition::new(
            "18. High station coverage (nst > 100)",
            QueryShape::FilteredTopN,
            format!("SELECT place, nst FROM {t} WHERE nst > 100 ORDER BY nst DESC LIMIT 5"),
        )
        .with_row_limit(5),
        QueryDefinition::new(
            "19. Tsunamis Triggered",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT {year} AS yr, SUM(tsunami) AS total_tsunamis FROM {t} GROUP BY {year} \
                 ORDER BY yr"
            ),
        ),
        QueryDefinition::new(
            "20. Count by alert color",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT alert, COUNT(*) AS quakes FROM {t} WHERE alert IS NOT NULL \
                 GROUP BY alert ORDER BY alert"
            ),
        ),
        QueryDefinition::new(
            format!("21. Top 5 countries by avg mag (since {since_year})"),
            QueryShape::GroupedRanked,
            format!(
                "SELECT place, {avg_mag} AS avg_mag FROM {t} WHERE {year} >= {since_year} \
                 GROUP BY place ORDER BY avg_mag DESC, place LIMIT 5"
            ),
        )
        .with_row_limit(5),
        QueryDefinition::new(
            "22. Countries with Shallow & Deep quakes in same month",
            QueryShape::GroupedHaving,
            format!(
                "SELECT place, {year} AS yr, {month} AS mon, \
                 MIN(depth_km) AS min_depth_km, MAX(depth_km) AS max_depth_km FROM {t} \
                 GROUP BY place, {year}, {month} \
                 HAVING MIN(depth_km) < 70 AND MAX(depth_km) > 300 \
                 ORDER BY place, yr, mon"
            ),
        ),
        QueryDefinition::new(
            "23. Year-over-Year Growth Rate",
            QueryShape::PeriodGrowth,
            format!(
                "WITH yearly AS (SELECT {year} AS yr, COUNT(*) AS total FROM {t} GROUP BY {year}) \
                 SELECT yr, total, LAG(total) OVER (ORDER BY yr) AS previous_total, {} AS growth_pct \
                 FROM yearly ORDER BY yr",
                dialect.guarded_ratio(
                    "(total - LAG(total) OVER (ORDER BY yr)) * 100",
                    "LAG(total) OVER (ORDER BY yr)"
                )
            ),
        ),
        QueryDefinition::new(
            "24. 3 Most active regions (Freq + Mag)",
            QueryShape::GroupedRanked,
            format!(
                "SELECT place, COUNT(*) AS freq, {avg_mag} AS avg_mag FROM {t} GROUP BY place \
                 ORDER BY freq DESC, avg_mag DESC, place LIMIT 3"
            ),
        )
        .with_row_limit(3),
        QueryDefinition::new(
            "25. Avg depth within 5 degrees of Equator",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT place, {} AS avg_depth_km FROM {t} WHERE latitude BETWEEN -5 AND 5 \
                 GROUP BY place ORDER BY avg_depth_km DESC, place",
                dialect.as_float("AVG(depth_km)")
            ),
        ),
        QueryDefinition::new(
            "26. Highest ratio of shallow to deep quakes",
            QueryShape::ConditionalRatio,
            format!(
                "SELECT place, shallow, deep, {} AS ratio FROM \
                 (SELECT place, {} AS shallow, {} AS deep FROM {t} GROUP BY place) AS per_place \
                 ORDER BY CASE WHEN deep = 0 THEN 1 ELSE 0 END, ratio DESC, place LIMIT 5",
                dialect.guarded_ratio("shallow", "deep"),
                count_where(SHALLOW),
                count_where(NOT_SHALLOW)
            ),
        )
        .with_row_limit(5),
        QueryDefinition::new(
            "27. Mag difference (Tsunami vs No Tsunami)",
            QueryShape::GroupedAggregate,
            format!(
                "SELECT tsunami, COUNT(*) AS quakes, {avg_mag} AS avg_mag FROM {t} \
                 GROUP BY tsunami ORDER BY tsunami"
            ),
        ),
        QueryDefinition::new(
            "28. Events with lowest reliability (High Gap/RMS)",
            QueryShape::FilteredTopN,
            format!(
                "SELECT id, place, gap, rms FROM {t} WHERE gap > 180 OR rms > 1.0 \
                 ORDER BY gap DESC, rms DESC LIMIT 5"
            ),
        )
        .with_row_limit(5),
        QueryDefinition::new(
            "30. Deep-focus Regions (> 300km)",
            QueryShape::GroupedRanked,
            format!(
                "SELECT place, COUNT(*) AS deep_count FROM {t} WHERE depth_km > 300 \
                 GROUP BY place ORDER BY deep_count DESC, place LIMIT 5"
            ),
        )
        .with_row_limit(5),
    ]
}
