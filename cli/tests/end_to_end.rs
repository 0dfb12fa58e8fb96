//! Source-to-execution tests: assemble a program, load the image
//! into a fresh machine, run to the halt, and check memory and
//! registers.

use std::fs::File;
use std::io::BufReader;

use assembler::{assemble_file, assemble_source, OutputOptions};
use base::prelude::ObjectImage;
use cpu::{ControlUnit, MemoryConfiguration, MemoryUnit, RunMode};

fn run_image(image: &ObjectImage, size: usize) -> (ControlUnit, MemoryUnit) {
    let mut control = ControlUnit::new();
    let mut mem = MemoryUnit::new(&MemoryConfiguration { size });
    control.load_image(&mut mem, image).expect("image fits");
    control.run(&mut mem).expect("no alarm");
    (control, mem)
}

#[test]
fn arithmetic_into_a_variable() {
    let source = "x\nldi %0 5\nldi %1 3\nadd %0 %1\nmove %0 &x\n";
    let image = assemble_source(source, 128).expect("program assembles");
    assert_eq!(image.words(), &[24, 0, 5, 24, 1, 3, 0, 0, 1, 12, 0, 127]);
    let (control, mem) = run_image(&image, 128);
    assert_eq!(mem.get(127), Some(8));
    assert_eq!(control.run_mode(), RunMode::Halted);
}

#[test]
fn counting_loop_with_a_flag_jump() {
    let source = "ldi %0 -5\nloop:\ninc %0\njnz &loop\nldi %1 99\n";
    let image = assemble_source(source, 64).expect("program assembles");
    let (control, _) = run_image(&image, 64);
    assert_eq!(control.register_value(0), Some(0));
    assert_eq!(control.register_value(1), Some(99));
}

#[test]
fn counting_loop_with_a_comparison_jump() {
    let source = "x\nldi %0 0\nldi %1 5\nloop:\ninc %0\njlw %0 %1 &loop\nmove %0 &x\n";
    let image = assemble_source(source, 64).expect("program assembles");
    let (_, mem) = run_image(&image, 64);
    assert_eq!(mem.get(63), Some(5));
}

#[test]
fn object_file_round_trip_through_the_filesystem() {
    let dir = tempfile::tempdir().expect("create temporary directory");
    let input = dir.path().join("program.dsf");
    let output = dir.path().join("program.dxf");
    std::fs::write(&input, "x\nldi %0 5\nldi %1 3\nadd %0 %1\nmove %0 &x\n")
        .expect("write source file");
    assemble_file(
        input.as_os_str(),
        &output,
        128,
        OutputOptions::default(),
    )
    .expect("program assembles");

    let image = ObjectImage::from_reader(BufReader::new(
        File::open(&output).expect("open object file"),
    ))
    .expect("object file is well-formed");
    let (_, mem) = run_image(&image, 128);
    assert_eq!(mem.get(127), Some(8));
}
