use chrono::NaiveDate;
use tour_itinerary::{
    dated_position, parse_itinerary, render_scene, resolve_setlist, Dispatcher, FetchError, Language, MapScope,
    SelectionOutcome, SetlistOutcome, StopStatus, Translator,
};

const ITINERARY: &str = r#"[
    {
        "name": "北京站 Day 1",
        "date": "2025-06-01",
        "coord": [116.4074, 39.9042],
        "country": "China",
        "province": "北京",
        "city": "北京",
        "location": "国家体育场",
        "setlist-name": "beijing-day1"
    },
    {
        "name": "北京站 Day 2",
        "date": "2025-06-01",
        "coord": [116.4074, 39.9042],
        "country": "China",
        "province": "北京",
        "city": "北京",
        "location": "国家体育场",
        "setlist-name": ""
    },
    {
        "name": "东京站（未官宣）",
        "date": "待定",
        "coord": [139.69, 35.69],
        "country": "Japan",
        "city": "东京（未官宣）",
        "location": ""
    }
]"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
}

#[test]
fn shared_venue_renders_two_distinct_ongoing_markers() -> Result<(), Box<dyn std::error::Error>> {
    let stops = parse_itinerary(ITINERARY)?;
    let scene = render_scene(&stops, MapScope::Domestic, today(), &Translator::new(Language::ZhCn));

    assert_eq!(scene.points.len(), 2);
    let [first, second] = [&scene.points[0], &scene.points[1]];
    assert_ne!(first.coordinate(), second.coordinate());
    assert_eq!(first.placement.original, second.placement.original);
    assert!(first.placement.offset && second.placement.offset);
    assert_eq!(first.status, StopStatus::Ongoing);
    assert_eq!(second.status, StopStatus::Ongoing);
    assert_eq!(first.label, "第1站：北京");
    assert_eq!(scene.path.len(), 1);

    let mut dispatcher = Dispatcher::new();
    let SelectionOutcome::Choose(candidates) = dispatcher.tap(&scene, 0) else {
        panic!("shared location should ask for a choice");
    };
    assert_eq!(candidates.len(), 2);
    assert_eq!(dispatcher.choose(1), SelectionOutcome::Open(1));
    Ok(())
}

#[test]
fn world_scope_highlights_every_country() -> Result<(), Box<dyn std::error::Error>> {
    let stops = parse_itinerary(ITINERARY)?;
    let scene = render_scene(&stops, MapScope::International, today(), &Translator::new(Language::En));

    assert_eq!(scene.points.len(), 3);
    assert_eq!(scene.points[2].status, StopStatus::Unannounced);
    let countries: Vec<_> = scene.regions.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(countries, vec!["China", "Japan"]);
    assert!((1.0..=6.0).contains(&scene.viewport.zoom));
    Ok(())
}

#[tokio::test]
async fn setlist_of_unnamed_stop_uses_fallback_stem() -> Result<(), Box<dyn std::error::Error>> {
    let stops = parse_itinerary(ITINERARY)?;
    let dated_index = dated_position(&stops, 1).ok_or("second stop is dated")?;
    let mut requested = Vec::new();
    let outcome = resolve_setlist(&stops[1], dated_index, |path: String| {
        requested.push(path);
        std::future::ready(Ok::<_, FetchError>(None))
    })
    .await;

    let SetlistOutcome::Unpublished { unannounced, stem } = outcome else {
        panic!("nothing was served");
    };
    assert!(unannounced);
    assert!(stem.starts_with("_02_"));
    assert_eq!(
        requested,
        vec![format!("setlist/{stem}.html"), format!("setlist/{stem}.md")]
    );
    Ok(())
}

#[tokio::test]
async fn unnamed_setlist_after_pending_stop_is_numbered_among_dated_stops(
) -> Result<(), Box<dyn std::error::Error>> {
    let stops = parse_itinerary(
        r#"[
            {"name": "武汉站", "date": "待定", "coord": [114.3, 30.6], "country": "China", "city": "武汉", "location": "光谷"},
            {"name": "成都站", "date": "2025-06-01", "coord": [104.06, 30.67], "country": "China", "city": "chengdu", "location": "凤凰山", "setlist-name": ""}
        ]"#,
    )?;
    let dated_index = dated_position(&stops, 1).ok_or("second stop is dated")?;
    assert_eq!(dated_index, 0);

    let served = "setlist/_01_chengdu.md";
    let outcome = resolve_setlist(&stops[1], dated_index, |path: String| {
        std::future::ready(Ok::<_, FetchError>((path == served).then(|| "# Chengdu".to_string())))
    })
    .await;
    assert!(matches!(
        outcome,
        SetlistOutcome::Document { ref path, .. } if path == served
    ));
    Ok(())
}
