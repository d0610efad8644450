use rune_visualiser_core::{
    Chart, Glyph, ImageFormat, Note, RenderWindow, Renderer, RuneVizError, TempoChange,
};

const CHART_JSON: &str = r#"{
    "notes": [
        { "time": 4.0, "lane": 0 },
        { "time": 4.5, "lane": 1 },
        { "time": 5.0, "lane": 2 },
        { "time": 5.6666666666666667, "lane": 3 },
        { "time": 6.5, "lane": 0 }
    ],
    "tempo_changes": [
        { "start_time": 0.0, "bpm": 150.0 },
        { "start_time": 4.0, "bpm": 300.0 }
    ]
}"#;

#[test]
fn renders_json_chart_end_to_end() {
    let chart = Chart::from_json(CHART_JSON).unwrap();
    let window = RenderWindow::compute(&chart).unwrap();

    assert_eq!(window.tempo.global_bpm, 150.0);
    assert_eq!(window.tempo.local_bpm, 300.0);
    // 2.5 raw beats at double tempo cover 1.25 canonical beats.
    assert_eq!(window.total_beats, 2);

    let glyphs: Vec<Glyph> = window
        .place_notes(&chart.notes)
        .iter()
        .map(|placement| placement.glyph)
        .collect();
    assert_eq!(
        glyphs,
        vec![
            Glyph::OnBeat,
            Glyph::Quarter,
            Glyph::Half,
            Glyph::Third,
            Glyph::Quarter,
        ]
    );

    let image = Renderer::new().unwrap().render(&chart).unwrap();
    assert_eq!(image.height(), window.canvas_height);
    let png = image.encode(ImageFormat::Png).unwrap();
    assert!(png.starts_with(b"\x89PNG"));
}

#[test]
fn identical_charts_encode_identically() {
    let chart = Chart::from_json(CHART_JSON).unwrap();
    let renderer = Renderer::new().unwrap();

    let first = renderer.render(&chart).unwrap().encode(ImageFormat::Png).unwrap();
    let second = renderer.render(&chart).unwrap().encode(ImageFormat::Png).unwrap();
    assert_eq!(first, second);
}

#[test]
fn note_cap_is_checked_before_rendering() {
    let renderer = Renderer::new().unwrap();
    let notes = |count: usize| -> Vec<Note> {
        (0..count)
            .map(|i| Note::new(i as f64 / 12.0, (i % 4) as u8))
            .collect()
    };

    let fifty = Chart::new(notes(50), vec![TempoChange::new(0.0, 120.0)]);
    assert!(renderer.render(&fifty).is_ok());

    let fifty_one = Chart::new(notes(51), vec![TempoChange::new(0.0, 120.0)]);
    let err = renderer.render(&fifty_one).unwrap_err();
    assert!(matches!(err, RuneVizError::TooManyNotes { count: 51, .. }));
    assert!(err.is_input_rejection());
}

#[test]
fn long_chart_is_rejected() {
    let chart = Chart::new(vec![Note::new(0.0, 0), Note::new(7.0, 1)], Vec::new());
    let err = Renderer::new().unwrap().render(&chart).unwrap_err();
    assert!(matches!(err, RuneVizError::TooManyBeats { beats: 7, max: 5 }));
}

#[test]
fn taller_windows_for_longer_charts() {
    let renderer = Renderer::new().unwrap();
    let mut previous = 0;
    for last in [0.5, 1.5, 2.5, 3.5, 4.5] {
        let chart = Chart::new(vec![Note::new(0.0, 0), Note::new(last, 3)], Vec::new());
        let height = renderer.render(&chart).unwrap().height();
        assert!(height > previous);
        previous = height;
    }
}
