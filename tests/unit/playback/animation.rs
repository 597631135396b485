use super::*;
use crate::compile::errors::AnimateError;
use crate::continuity::ast::{Procedure, VarSlot};
use crate::continuity::dsl::*;
use crate::show::builder::{SheetBuilder, ShowBuilder};
use crate::show::model::{Sheet, SymbolClass};

fn one_point(name: &str, beats: u32, start: Coord, procs: Vec<Procedure>) -> Sheet {
    SheetBuilder::new(name, beats)
        .point(start)
        .continuity(SymbolClass::Plain, procs)
        .unwrap()
        .build()
        .unwrap()
}

fn forward_then_mark() -> Show {
    ShowBuilder::new()
        .sheet(one_point("1", 8, Coord::ZERO, vec![fm(4, E), mt(4, E)]))
        .build()
        .unwrap()
}

#[test]
fn march_then_mark_time_end_to_end() {
    let anim = Animation::build(&forward_then_mark()).unwrap();
    assert_eq!(anim.total_beats(), 8);
    assert!(!anim.has_errors());
    assert_eq!(anim.position_at(0, 0).unwrap(), Coord::ZERO);
    assert_eq!(anim.position_at(0, 2).unwrap(), Coord::steps(2, 0));
    assert_eq!(anim.position_at(0, 4).unwrap(), Coord::steps(4, 0));
    assert_eq!(anim.position_at(0, 8).unwrap(), Coord::steps(4, 0));
}

#[test]
fn overshoot_stops_proportionally_short() {
    let show = ShowBuilder::new()
        .sheet(one_point("1", 6, Coord::ZERO, vec![fm(10, E)]))
        .build()
        .unwrap();
    let anim = Animation::build(&show).unwrap();
    let errors = anim.errors_for_sheet(0).unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains(AnimateError::OutOfTime));
    assert_eq!(anim.total_beats(), 6);
    assert_eq!(anim.position_at(0, 6).unwrap(), Coord::new(96, 0));
}

#[test]
fn queries_do_not_leak_state() {
    let anim = Animation::build(&forward_then_mark()).unwrap();
    let a = anim.position_at(0, 5).unwrap();
    let _ = anim.position_at(0, 2).unwrap();
    let b = anim.position_at(0, 5).unwrap();
    assert_eq!(a, b);
}

#[test]
fn boundaries_belong_to_the_later_sheet() {
    let show = ShowBuilder::new()
        .sheet(one_point("1", 8, Coord::ZERO, vec![]))
        .sheet(one_point("2", 4, Coord::steps(8, 0), vec![]))
        .build()
        .unwrap();
    let anim = Animation::build(&show).unwrap();
    assert_eq!(anim.total_beats(), 12);
    assert_eq!(anim.locate(0).unwrap(), (0, 0));
    assert_eq!(anim.locate(7).unwrap(), (0, 7));
    assert_eq!(anim.locate(8).unwrap(), (1, 0));
    assert_eq!(anim.locate(12).unwrap(), (1, 4));
    assert!(matches!(anim.locate(13), Err(DrillError::Playback(_))));
    assert_eq!(anim.position_at(0, 8).unwrap(), Coord::steps(8, 0));
    assert_eq!(anim.position_at(0, 4).unwrap(), Coord::steps(4, 0));
}

#[test]
fn direction_variables_carry_across_sheets() {
    let show = ShowBuilder::new()
        .sheet(one_point("1", 2, Coord::ZERO, vec![fm(2, N)]))
        .sheet(one_point(
            "2",
            2,
            Coord::steps(0, -2),
            vec![fm(2, var(VarSlot::Dof))],
        ))
        .build()
        .unwrap();
    let anim = Animation::build(&show).unwrap();
    assert!(!anim.has_errors());
    assert_eq!(anim.position_at(0, 4).unwrap(), Coord::steps(0, -4));

    // a standalone compile starts with empty variables
    let (_, errors) =
        crate::compile::compiler::compile(&show, 1, 0, SymbolClass::Plain).unwrap();
    assert!(errors.contains(AnimateError::UndefinedVariable));
}

#[test]
fn sheets_outside_the_animation_are_skipped() {
    let hidden = SheetBuilder::new("hidden", 4)
        .in_animation(false)
        .point(Coord::steps(50, 50))
        .build()
        .unwrap();
    let show = ShowBuilder::new()
        .sheet(one_point("1", 4, Coord::ZERO, vec![]))
        .sheet(hidden)
        .sheet(one_point("3", 4, Coord::steps(4, 0), vec![]))
        .build()
        .unwrap();
    let anim = Animation::build(&show).unwrap();
    assert_eq!(anim.sheets().len(), 2);
    assert_eq!(anim.total_beats(), 8);
    assert_eq!(anim.sheet_for_show_index(1), None);
    assert_eq!(anim.sheet_for_show_index(2), Some(1));
    assert!(anim.errors_for_sheet(1).is_none());
    assert!(anim.errors_for_sheet(2).unwrap().is_empty());
    assert_eq!(anim.position_at(0, 4).unwrap(), Coord::steps(4, 0));
}

fn crowd() -> Show {
    let sheet = |name: &str, beats: u32, offset: i32| {
        let mut b = SheetBuilder::new(name, beats);
        for i in 0..12 {
            let sym = if i % 2 == 0 {
                SymbolClass::Plain
            } else {
                SymbolClass::X
            };
            b = b.point_with_symbol(Coord::steps(i * 2 + offset, i - offset), sym);
        }
        b.continuity(SymbolClass::X, [fm(2, NE), mt(div(1, 0), E)])
            .unwrap()
            .build()
            .unwrap()
    };
    ShowBuilder::new()
        .sheet(sheet("a", 8, 0))
        .sheet(sheet("b", 6, 3))
        .sheet(sheet("c", 4, -1))
        .build()
        .unwrap()
}

#[test]
fn parallel_build_matches_sequential() {
    let show = crowd();
    let seq = Animation::build(&show).unwrap();
    let opts = BuildOptions {
        parallel: true,
        threads: Some(3),
        ..BuildOptions::default()
    };
    let par = Animation::build_with(&show, &opts).unwrap();

    assert_eq!(seq.total_beats(), par.total_beats());
    for beat in 0..=seq.total_beats() {
        assert_eq!(
            seq.positions_at(beat).unwrap(),
            par.positions_at(beat).unwrap()
        );
    }
    for (a, b) in seq.sheets().iter().zip(par.sheets()) {
        assert_eq!(a.errors, b.errors);
        assert_eq!(a.sequences, b.sequences);
    }
    let marker = seq.sheets()[0].errors.get(AnimateError::DivisionByZero).unwrap();
    assert_eq!(marker.points.len(), 6);
    assert_eq!(marker.symbol, SymbolClass::X);
}

#[test]
fn zero_threads_is_rejected() {
    let opts = BuildOptions {
        parallel: true,
        threads: Some(0),
        ..BuildOptions::default()
    };
    let err = Animation::build_with(&forward_then_mark(), &opts).unwrap_err();
    assert!(matches!(err, DrillError::Validation(_)));
}

#[test]
fn out_of_range_queries_are_playback_errors() {
    let anim = Animation::build(&forward_then_mark()).unwrap();
    assert!(matches!(anim.position_at(1, 0), Err(DrillError::Playback(_))));
    assert!(matches!(anim.position_at(0, 9), Err(DrillError::Playback(_))));
    assert!(anim.path_for(0, 1).is_err());
}

#[test]
fn collisions_at_reports_closing_marchers() {
    let sheet = SheetBuilder::new("1", 4)
        .point(Coord::ZERO)
        .point_with_symbol(Coord::steps(4, 0), SymbolClass::Sol)
        .continuity(SymbolClass::Plain, [fm(4, E)])
        .unwrap()
        .continuity(SymbolClass::Sol, [mtrm(W)])
        .unwrap()
        .build()
        .unwrap();
    let show = ShowBuilder::new().sheet(sheet).build().unwrap();
    let anim = Animation::build(&show).unwrap();

    assert!(anim.collisions_at(2).unwrap().is_empty());
    let pair = PointPair::new(0, 1);
    assert_eq!(
        anim.collisions_at(3).unwrap().get(&pair),
        Some(&CollisionKind::Warning)
    );
    let all = anim.all_collisions();
    assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![3, 4]);
    assert_eq!(all[&4][&pair], CollisionKind::Intersect);
}

#[test]
fn path_segments_chain_start_positions() {
    let anim = Animation::build(&forward_then_mark()).unwrap();
    let path = anim.path_for(0, 0).unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path[0].0, Coord::ZERO);
    assert_eq!(path[1].0, Coord::steps(4, 0));
    assert_eq!(path[1].1.beats(), 4);
}
