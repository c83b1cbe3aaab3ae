//! Surface benchmark: scrolling, batched printing and image blits.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fable::{Console, ConsoleConfig, Host, Image, InputEvent, Rect, Rgb, Style, Surface};
use std::io;
use std::time::Duration;

/// A host that discards frames and never delivers events.
struct NullHost;

impl Host for NullHost {
    fn is_running(&self) -> bool {
        true
    }

    fn size(&self) -> (u16, u16) {
        (120, 40)
    }

    fn wait_event(&mut self, _timeout: Duration) -> Option<InputEvent> {
        None
    }

    fn present(&mut self, frame: &Surface, _dirty: &[Rect], _caret: Option<(u16, u16)>) -> io::Result<()> {
        black_box(frame);
        Ok(())
    }
}

fn scroll_by_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_up_200x50");

    for distance in [1u16, 5, 25, 50] {
        let mut surface = Surface::new(200, 50, Rgb::DEFAULT_BG);
        for y in 0..50 {
            surface.draw_text(0, y, "You are standing in an open field west of a white house.", Style::default());
        }

        group.bench_with_input(BenchmarkId::from_parameter(distance), &distance, |bench, &d| {
            bench.iter(|| surface.scroll_up(black_box(surface.bounds()), d, Rgb::DEFAULT_BG));
        });
    }

    group.finish();
}

fn streamed_printing(c: &mut Criterion) {
    let mut console = Console::new(NullHost, ConsoleConfig::default()).expect("console");
    let words: Vec<&str> = "It is pitch black. You are likely to be eaten by a grue. "
        .split_inclusive(' ')
        .collect();

    c.bench_function("print_and_flush_line_word_by_word", |bench| {
        bench.iter(|| {
            for word in &words {
                console.print_text(black_box(word), 0, 39);
            }
            console.flush_text();
            console.scroll_up(0, 0, 119, 39, 1);
        });
    });
}

fn image_blit(c: &mut Criterion) {
    let mut surface = Surface::new(200, 50, Rgb::DEFAULT_BG);
    let image = Image::new(40, 12, Style::new(Rgb::WHITE, Rgb::BLACK).cell('#'));

    c.bench_function("blit_40x12", |bench| {
        bench.iter(|| surface.blit(black_box(&image), 80, 20));
    });
}

criterion_group!(benches, scroll_by_distance, streamed_printing, image_blit);
criterion_main!(benches);
