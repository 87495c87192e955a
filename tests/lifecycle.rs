use std::sync::Arc;

use vout_gtk::{
    chroma::Chroma,
    host::RenderFormat,
    painter::PaintMode,
    pattern,
    picture::{new_picture, Picture, PictureStatus, PictureType},
    rotate::rotate_image,
    surface::SurfaceState,
    toolkit::{headless::HeadlessToolkit, Toolkit},
    VideoOutput, VoutConfig, VoutError, VoutHost, VoutModule,
};

fn open(toolkit: &Arc<HeadlessToolkit>, config: VoutConfig) -> VideoOutput {
    VideoOutput::open(toolkit.clone(), config).unwrap()
}

#[test]
fn open_on_16_bit_display_negotiates_rv16() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut vout = open(&toolkit, VoutConfig::default());
    assert_eq!(vout.surface_state(), SurfaceState::Running);

    let mut host = VoutHost::default();
    vout.init(&mut host).unwrap();

    assert_eq!(host.output.chroma, Some(Chroma::Rv16));
    assert_eq!(
        (host.output.masks.red, host.output.masks.green, host.output.masks.blue),
        (0xf800, 0x07e0, 0x001f)
    );
    assert_eq!((host.output.width, host.output.height), (320, 240));
    assert_eq!(host.output.aspect, host.render.aspect);

    assert_eq!(host.pictures.output_count(), 1);
    let picture = host.pictures.output(0).unwrap();
    assert_eq!(picture.status, PictureStatus::Destroyed);
    assert_eq!(picture.kind, PictureType::Direct);
    assert_eq!(picture.plane().pixel_bytes, 2);

    vout.end(&mut host);
    vout.close();
}

#[test]
fn open_on_32_bit_display_negotiates_rv32() {
    let toolkit = Arc::new(HeadlessToolkit::new(32));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();
    vout.init(&mut host).unwrap();

    assert_eq!(host.output.chroma, Some(Chroma::Rv32));
    assert_eq!(host.output.masks, Chroma::Rv32.masks());
    assert_eq!(host.pictures.output(0).unwrap().plane().pixel_bytes, 4);
    assert_eq!(vout.depth(), Some(32));
}

#[test]
fn rv32_request_on_16_bit_display_fails() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut host = VoutHost::default();
    host.output.chroma = Some(Chroma::Rv32);
    host.output.width = 320;
    host.output.height = 240;

    let mut picture = Picture::default();
    assert!(matches!(
        new_picture(toolkit.as_ref(), 16, &host.output, &mut picture),
        Err(VoutError::FormatMismatch { .. })
    ));
    assert!(!picture.is_allocated());
    assert_eq!(toolkit.stats().images(), 0);
}

#[test]
fn unsupported_depth_leaves_pool_empty() {
    // 24 bits negotiates RV32, which only a 32-bit display can allocate.
    let toolkit = Arc::new(HeadlessToolkit::new(24));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    assert_eq!(host.output.chroma, Some(Chroma::Rv32));
    assert_eq!(host.pictures.output_count(), 0);
    assert!(host.pictures.iter().all(|picture| !picture.is_allocated()));

    vout.end(&mut host);
    assert_eq!(host.pictures.output_count(), 0);
}

#[test]
fn pool_is_truncated_at_first_failure() {
    let toolkit = Arc::new(HeadlessToolkit::new(16).with_image_budget(2));
    let mut config = VoutConfig::default();
    config.set_direct_buffers(4);
    let mut vout = open(&toolkit, config);
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    assert_eq!(host.pictures.output_count(), 2);
    assert_eq!(host.pictures.output_indices(), &[0, 1]);
}

#[test]
fn pool_never_exceeds_its_ceiling() {
    let toolkit = Arc::new(HeadlessToolkit::new(32));
    let mut config = VoutConfig::default();
    config.set_direct_buffers(3);
    let mut vout = open(&toolkit, config);
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    assert_eq!(host.pictures.output_count(), 3);
    assert_eq!(toolkit.stats().images(), 3);
    assert_eq!(host.pictures.iter().filter(|p| p.is_allocated()).count(), 3);
}

#[test]
fn end_frees_everything_once() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut config = VoutConfig::default();
    config.set_direct_buffers(3);
    let mut vout = open(&toolkit, config);
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    vout.end(&mut host);
    assert_eq!(toolkit.stats().freed(), vec![2, 1, 0]);
    assert_eq!(host.pictures.output_count(), 0);
    assert!(host.pictures.iter().all(|picture| !picture.is_allocated()
        && picture.status == PictureStatus::Free
        && picture.kind == PictureType::Empty));

    // A second end has nothing left to free.
    vout.end(&mut host);
    assert_eq!(toolkit.stats().freed().len(), 3);

    // Slots come back for the next init.
    vout.init(&mut host).unwrap();
    assert_eq!(host.pictures.output_indices(), &[0, 1, 2]);
    assert_eq!(toolkit.stats().images(), 6);
}

#[test]
fn oversized_output_leaves_pool_empty() {
    let toolkit = Arc::new(HeadlessToolkit::new(32).without_frame_buffer());
    let mut config = VoutConfig::default();
    config.set_size(1 << 31, 1 << 31);
    config.set_direct_buffers(2);
    let mut vout = open(&toolkit, config);
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    assert_eq!(host.pictures.output_count(), 0);
    assert!(host.pictures.iter().all(|picture| !picture.is_allocated()));

    vout.end(&mut host);
    assert!(toolkit.stats().freed().is_empty());
}

#[test]
fn init_again_releases_the_previous_pool() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut config = VoutConfig::default();
    config.set_direct_buffers(2);
    let mut vout = open(&toolkit, config);
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    vout.init(&mut host).unwrap();

    assert_eq!(toolkit.stats().freed(), vec![1, 0]);
    assert_eq!(host.pictures.output_indices(), &[0, 1]);
    assert_eq!(host.pictures.iter().filter(|p| p.is_allocated()).count(), 2);
}

#[test]
fn depth_is_fixed_at_first_init() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();

    vout.init(&mut host).unwrap();
    vout.end(&mut host);
    vout.init(&mut host).unwrap();
    assert_eq!(vout.depth(), Some(16));
    assert_eq!(host.output.chroma, Some(Chroma::Rv16));
}

#[test]
fn close_without_init() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();

    vout.end(&mut host);
    vout.close();

    assert_eq!(toolkit.stats().quits(), 1);
    assert!(!toolkit.registry().is_claimed());
}

#[test]
fn dropping_the_output_closes_it() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    drop(open(&toolkit, VoutConfig::default()));
    assert_eq!(toolkit.stats().windows_closed(), 1);
    assert!(!toolkit.registry().is_claimed());
}

#[test]
fn open_fails_when_no_window() {
    let toolkit = Arc::new(HeadlessToolkit::new(16).with_failing_windows());
    assert!(VideoOutput::open(toolkit.clone(), VoutConfig::default()).is_err());
    assert!(!toolkit.registry().is_claimed());
}

#[test]
fn second_output_shares_the_application() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let stats = toolkit.stats();

    let first = open(&toolkit, VoutConfig::default());
    let second = open(&toolkit, VoutConfig::default());
    assert!(first.owns_application());
    assert!(!second.owns_application());

    second.close();
    assert_eq!(stats.quits(), 0);

    first.close();
    assert_eq!(stats.quits(), 1);
}

#[test]
fn reopen_after_close() {
    let toolkit = Arc::new(HeadlessToolkit::new(32));
    for _ in 0..2 {
        let mut vout = open(&toolkit, VoutConfig::default());
        let mut host = VoutHost::default();
        vout.init(&mut host).unwrap();
        vout.end(&mut host);
        vout.close();
    }
    assert_eq!(toolkit.stats().event_loops(), 2);
    assert_eq!(toolkit.stats().quits(), 2);
}

#[test]
fn display_rotates_into_the_window() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();
    vout.init(&mut host).unwrap();

    let image = host.pictures.output_mut(0).unwrap().image_mut().unwrap();
    pattern::gradient(image, 11).unwrap();
    let expected = rotate_image(toolkit.as_ref(), image).unwrap();

    let picture = host.pictures.output(0).unwrap();
    vout.display(&host, picture).unwrap();

    let drawn = toolkit.stats().last_draw().unwrap();
    assert_eq!((drawn.x, drawn.y), (0, 0));
    assert_eq!((drawn.image.width(), drawn.image.height()), (240, 320));
    assert_eq!(drawn.image, expected);
}

#[test]
fn rotation_shares_the_image_budget() {
    let toolkit = Arc::new(HeadlessToolkit::new(16).with_image_budget(1));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();
    vout.init(&mut host).unwrap();
    assert_eq!(host.pictures.output_count(), 1);

    let picture = host.pictures.output(0).unwrap();
    assert!(matches!(
        vout.display(&host, picture),
        Err(VoutError::Allocation(_))
    ));
    assert_eq!(toolkit.stats().draws(), 0);
}

#[test]
fn display_uses_host_placement() {
    let toolkit = Arc::new(HeadlessToolkit::new(32));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::new(RenderFormat {
        aspect: vout_gtk::placement::VOUT_ASPECT_FACTOR * 16 / 9,
        ..RenderFormat::default()
    });
    vout.init(&mut host).unwrap();

    let picture = host.pictures.output(0).unwrap();
    vout.display(&host, picture).unwrap();

    let drawn = toolkit.stats().last_draw().unwrap();
    assert_eq!((drawn.x, drawn.y), (0, 30));
}

#[test]
fn direct_mode_copies_without_rotation() {
    let toolkit = Arc::new(HeadlessToolkit::new(32));
    let mut config = VoutConfig::default();
    config.set_paint_mode(PaintMode::Direct);
    let mut vout = open(&toolkit, config);
    assert_eq!(vout.paint_mode(), PaintMode::Direct);

    let mut host = VoutHost::default();
    vout.init(&mut host).unwrap();
    let image = host.pictures.output_mut(0).unwrap().image_mut().unwrap();
    pattern::gradient(image, 4).unwrap();
    let expected = image.clone();

    let picture = host.pictures.output(0).unwrap();
    vout.display(&host, picture).unwrap();

    assert_eq!(toolkit.stats().draws(), 0);
    assert_eq!(toolkit.stats().last_flush().unwrap(), expected);
}

#[test]
fn direct_mode_falls_back_without_frame_buffer() {
    let toolkit = Arc::new(HeadlessToolkit::new(16).without_frame_buffer());
    let mut config = VoutConfig::default();
    config.set_paint_mode(PaintMode::Direct);
    let vout = open(&toolkit, config);
    assert_eq!(vout.paint_mode(), PaintMode::Rotate);
}

#[test]
fn display_needs_an_image() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut vout = open(&toolkit, VoutConfig::default());
    let host = VoutHost::default();
    assert!(matches!(
        vout.display(&host, &Picture::default()),
        Err(VoutError::EmptyPicture)
    ));
}

#[test]
fn optional_entry_points_are_inert() {
    let toolkit = Arc::new(HeadlessToolkit::new(16));
    let mut vout = open(&toolkit, VoutConfig::default());
    let mut host = VoutHost::default();

    let descriptor = vout.descriptor();
    assert_eq!(descriptor.capability, "video output");
    assert_eq!(descriptor.score, 20);
    assert_eq!(descriptor, VideoOutput::DESCRIPTOR);

    let capabilities = vout.capabilities();
    assert!(capabilities.init && capabilities.end && capabilities.display);
    assert!(!capabilities.render && !capabilities.manage);

    vout.render(&host, &Picture::default());
    vout.manage(&mut host).unwrap();
    vout.toggle_fullscreen();
    assert_eq!(vout.surface_state(), SurfaceState::Running);
    assert_eq!(toolkit.stats().draws(), 0);
}
