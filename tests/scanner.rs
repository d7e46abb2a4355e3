use jpeg_source::{
    MarkerCode, MarkerScanner, Markers, RecoveryAction, Suspended,
    diagnostics::{Diagnostics, Trace, Warning},
    scanner::MarkerError,
    source::{FeedSource, SliceSource},
};

#[test]
fn first_marker_accepts_start_of_image() {
    let data = [0xFF, 0xD8, 0xFF, 0xD9];
    let mut markers = Markers::with_diagnostics(SliceSource::new(&data), Recorder::default());

    markers.first_marker().unwrap();
    assert_eq!(markers.unread_marker(), None);
    assert_eq!(markers.read_marker(), Ok(MarkerCode::EOI));
}

#[test]
fn first_marker_rejects_other_data() {
    let mut markers = Markers::with_diagnostics(SliceSource::new(b"GIF89a"), Recorder::default());

    assert_eq!(
        markers.first_marker(),
        Err(MarkerError::NoStartOfImage(0x47, 0x49))
    );
}

#[test]
fn scan_reports_extraneous_data() {
    let data = [0x12, 0x34, 0xFF, 0x00, 0xFF, 0xFF, 0xD3];
    let mut markers = Markers::with_diagnostics(SliceSource::new(&data), Recorder::default());

    assert_eq!(markers.read_marker(), Ok(MarkerCode::restart(3)));
    assert_eq!(
        markers.diagnostics().warnings,
        [Warning::ExtraneousData {
            discarded: 4,
            marker: MarkerCode::restart(3),
        }]
    );
}

#[test]
fn scan_resumes_after_fill_byte() {
    let mut markers = Markers::with_diagnostics(FeedSource::new(), Recorder::default());

    markers.cursor_mut().source_mut().feed(&[0x00, 0xFF]);
    assert_eq!(markers.read_marker(), Err(Suspended));

    markers.cursor_mut().source_mut().feed(&[0xD4]);
    assert_eq!(markers.read_marker(), Ok(MarkerCode::restart(4)));

    assert_eq!(
        markers.diagnostics().warnings,
        [Warning::ExtraneousData {
            discarded: 1,
            marker: MarkerCode::restart(4),
        }]
    );
    assert_eq!(markers.cursor().source().suspensions(), 1);
}

#[test]
fn skip_variable_segment() {
    let data = [
        0xFF, 0xD8, // SOI
        0xFF, 0xE0, 0x00, 0x05, 0xAA, 0xBB, 0xCC, // APP0
        0xFF, 0xDB, // DQT
    ];
    let mut markers =
        Markers::with_diagnostics(SliceSource::with_chunk_size(&data, 4), Recorder::default());

    markers.first_marker().unwrap();
    assert_eq!(markers.read_marker(), Ok(MarkerCode::APP0));

    markers.skip_variable().unwrap();
    assert_eq!(markers.unread_marker(), None);
    assert_eq!(markers.read_marker(), Ok(MarkerCode::DQT));

    let diagnostics = markers.diagnostics();
    assert!(diagnostics.warnings.is_empty());
    assert_eq!(
        diagnostics.traces,
        [(
            1,
            Trace::SkipSegment {
                marker: MarkerCode::APP0,
                length: 5,
            }
        )]
    );
}

#[test]
fn intact_restart_sequence() {
    let data = [0xFF, 0xD0, 0xFF, 0xD1, 0xFF, 0xD2];
    let mut markers = Markers::with_diagnostics(SliceSource::new(&data), Recorder::default());

    for _ in 0..3 {
        assert_eq!(markers.read_restart_marker(), Ok(None));
    }

    assert_eq!(markers.next_restart(), 3);

    let diagnostics = markers.diagnostics();
    assert!(diagnostics.warnings.is_empty());
    assert_eq!(
        diagnostics.traces,
        [
            (3, Trace::Restart { index: 0 }),
            (3, Trace::Restart { index: 1 }),
            (3, Trace::Restart { index: 2 }),
        ]
    );
}

#[test]
fn corrupted_restart_is_deferred() {
    // RST1 was lost; a stray byte precedes RST2.
    let data = [0xFF, 0xD0, 0x55, 0xFF, 0xD2, 0xFF, 0xD3];
    let mut markers = Markers::with_diagnostics(SliceSource::new(&data), Recorder::default());

    assert_eq!(markers.read_restart_marker(), Ok(None));
    assert_eq!(
        markers.read_restart_marker(),
        Ok(Some(RecoveryAction::Defer))
    );
    assert_eq!(markers.unread_marker(), Some(MarkerCode::restart(2)));
    assert_eq!(markers.next_restart(), 2);

    // The deferred marker is the one expected next.
    assert_eq!(markers.read_restart_marker(), Ok(None));
    assert_eq!(markers.read_restart_marker(), Ok(None));
    assert_eq!(markers.next_restart(), 4);

    assert_eq!(
        markers.diagnostics().warnings,
        [
            Warning::ExtraneousData {
                discarded: 1,
                marker: MarkerCode::restart(2),
            },
            Warning::MustResync {
                marker: MarkerCode::restart(2),
                desired: 1,
            },
        ]
    );
}

#[test]
fn stale_restart_is_scanned_past() {
    let data = [0xFF, 0xD0, 0xFF, 0xD0, 0x11, 0x22, 0xFF, 0xD1];
    let mut markers = Markers::with_diagnostics(SliceSource::new(&data), Recorder::default());

    assert_eq!(markers.read_restart_marker(), Ok(None));
    assert_eq!(
        markers.read_restart_marker(),
        Ok(Some(RecoveryAction::Discard))
    );
    assert_eq!(markers.unread_marker(), None);
    assert_eq!(markers.next_restart(), 2);

    let actions: Vec<_> = markers
        .diagnostics()
        .traces
        .iter()
        .filter_map(|(_, event)| match event {
            Trace::RecoveryAction { marker, action } => Some((marker.0, *action)),
            _ => None,
        })
        .collect();

    assert_eq!(
        actions,
        [
            (0xD0, RecoveryAction::ScanForward),
            (0xD1, RecoveryAction::Discard),
        ]
    );
}

#[test]
fn end_of_image_ends_scan() {
    let data = [0xFF, 0xD9];
    let mut markers = Markers::with_diagnostics(SliceSource::new(&data), Recorder::default());

    assert_eq!(
        markers.read_restart_marker(),
        Ok(Some(RecoveryAction::Defer))
    );
    assert_eq!(markers.unread_marker(), Some(MarkerCode::EOI));

    markers.reset_restart();
    assert_eq!(markers.next_restart(), 0);
}

#[test]
fn resync_suspends_until_fed() {
    let mut markers = Markers::with_diagnostics(FeedSource::new(), Recorder::default());
    markers.cursor_mut().source_mut().feed(&[0xFF, 0xD0, 0xFF, 0xD7]);

    assert_eq!(markers.read_restart_marker(), Ok(None));

    // RST7 is stale for RST1; nothing follows it yet.
    assert_eq!(markers.read_restart_marker(), Err(Suspended));
    assert_eq!(markers.next_restart(), 1);

    markers.cursor_mut().source_mut().feed(&[0xFF, 0xD1]);
    assert_eq!(
        markers.read_restart_marker(),
        Ok(Some(RecoveryAction::Discard))
    );
    assert_eq!(markers.next_restart(), 2);

    let (source, diagnostics) = markers.finish();
    assert_eq!(source.suspensions(), 1);
    assert_eq!(
        diagnostics
            .warnings
            .iter()
            .filter(|w| matches!(w, Warning::MustResync { .. }))
            .count(),
        2
    );
}

#[test]
fn truncated_feed_ends_with_fake_eoi() {
    let mut markers = Markers::with_diagnostics(FeedSource::new(), Recorder::default());
    markers.cursor_mut().source_mut().feed(&[0x01, 0x02]);
    markers.cursor_mut().source_mut().finish_input();

    assert_eq!(markers.read_marker(), Ok(MarkerCode::EOI));
}

#[derive(Debug, Default)]
struct Recorder {
    warnings: Vec<Warning>,
    traces: Vec<(u8, Trace)>,
}

impl Diagnostics for Recorder {
    fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    fn trace(&mut self, level: u8, event: Trace) {
        self.traces.push((level, event));
    }
}
