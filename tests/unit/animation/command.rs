use super::*;

fn samples() -> Vec<Command> {
    vec![
        Command::mark_time(4, 90.0),
        Command::movement(7, Coord::new(53, -29)),
        Command::movement(3, Coord::new(-64, 17)),
        Command::rotate(6, Coord::ZERO, 64.0, 0.0, 90.0, false),
        Command::rotate(5, Coord::steps(2, 0), 32.0, 180.0, 45.0, true),
    ]
}

fn start_of(cmd: &Command) -> Coord {
    match cmd.kind() {
        CommandKind::Rotate {
            center,
            radius,
            start_angle,
            ..
        } => {
            let rad = start_angle.to_radians();
            Coord::new(
                round_to_units(f64::from(center.x) + rad.cos() * radius),
                round_to_units(f64::from(center.y) - rad.sin() * radius),
            )
        }
        _ => Coord::steps(3, -2),
    }
}

#[test]
fn apply_forward_then_backward_round_trips() {
    for mut cmd in samples() {
        let start = start_of(&cmd);
        let mut pt = start;
        cmd.apply_forward(&mut pt);
        cmd.apply_backward(&mut pt);
        assert_eq!(pt, start, "{cmd:?}");
        assert_eq!(cmd.cursor(), 0);
    }
}

#[test]
fn stepping_agrees_with_apply_forward() {
    for cmd in samples() {
        let start = start_of(&cmd);

        let mut jumped = cmd.clone();
        let mut a = start;
        jumped.apply_forward(&mut a);

        let mut stepped = cmd.clone();
        let mut b = start;
        assert!(stepped.begin(&mut b));
        let mut steps = 0;
        loop {
            steps += 1;
            if !stepped.next_beat(&mut b) {
                break;
            }
        }
        assert_eq!(steps, cmd.beats());
        assert_eq!(a, b, "{cmd:?}");
    }
}

#[test]
fn stepping_back_retraces_forward_positions() {
    for mut cmd in samples() {
        let mut pt = start_of(&cmd);
        cmd.begin(&mut pt);
        let mut forward = vec![pt];
        while cmd.next_beat(&mut pt) {
            forward.push(pt);
        }
        forward.push(pt);
        forward.dedup();

        let mut backward = vec![pt];
        while cmd.prev_beat(&mut pt) {
            backward.push(pt);
        }
        backward.reverse();
        backward.dedup();
        assert_eq!(forward, backward, "{cmd:?}");
    }
}

#[test]
fn move_deltas_sum_to_vector_without_drift() {
    for beats in 1..=13u32 {
        for (x, y) in [(1, -1), (7, 3), (-100, 45), (64, 0), (-3, -17)] {
            let v = Coord::new(x, y);
            let mut cmd = Command::movement(beats, v);
            let mut pt = Coord::ZERO;
            cmd.begin(&mut pt);
            for k in 1..=beats {
                let before = pt;
                cmd.next_beat(&mut pt);
                let n = i64::from(beats);
                let expect_x = (i64::from(x) * i64::from(k)).div_euclid(n)
                    - (i64::from(x) * i64::from(k - 1)).div_euclid(n);
                assert_eq!(i64::from(pt.x - before.x), expect_x);
            }
            assert_eq!(pt, v, "beats={beats} v={v:?}");
        }
    }
}

#[test]
fn clipped_move_stops_short() {
    let v = Coord::steps(4, 0);
    let mut cmd = Command::movement(10, v);
    cmd.clip_beats(6);
    assert_eq!(cmd.beats(), 6);
    let mut pt = Coord::ZERO;
    cmd.apply_forward(&mut pt);
    assert!(pt.x > 0 && pt.x < v.x);
    assert_eq!(pt, Coord::new(64 * 6 / 10, 0));
}

#[test]
fn clip_never_lengthens() {
    let mut cmd = Command::mark_time(4, 0.0);
    cmd.clip_beats(9);
    assert_eq!(cmd.beats(), 4);
}

#[test]
fn zero_beat_commands_apply_instantly() {
    let mut cmd = Command::movement(0, Coord::steps(2, 2));
    let mut pt = Coord::ZERO;
    assert!(!cmd.begin(&mut pt));
    assert_eq!(pt, Coord::steps(2, 2));
    assert!(!cmd.end(&mut pt));
    assert_eq!(pt, Coord::ZERO);
    assert!(!cmd.next_beat(&mut pt));
    assert!(!cmd.prev_beat(&mut pt));
}

#[test]
fn seek_matches_incremental_position() {
    let mut a = Command::movement(9, Coord::new(-77, 40));
    let mut b = a.clone();
    let mut pa = Coord::ZERO;
    let mut pb = Coord::ZERO;
    a.begin(&mut pa);
    for _ in 0..5 {
        a.next_beat(&mut pa);
    }
    b.seek(&mut pb, 5);
    assert_eq!(pa, pb);
    b.seek(&mut pb, 2);
    a.prev_beat(&mut pa);
    a.prev_beat(&mut pa);
    a.prev_beat(&mut pa);
    assert_eq!(pa, pb);
}

#[test]
fn directions_follow_command_kind() {
    let mt = Command::mark_time(2, 270.0);
    assert_eq!(mt.motion_direction(), 270.0);
    assert_eq!(mt.facing(), AnimateDir::S);

    let mv = Command::movement_facing(2, Coord::steps(0, -2), 270.0);
    assert!((mv.motion_direction() - 90.0).abs() < 1e-9);
    assert_eq!(mv.real_direction(), 270.0);

    // counter-clockwise sweep starting east of centre heads north
    let mut rot = Command::rotate(4, Coord::ZERO, 64.0, 0.0, 90.0, false);
    assert!((rot.real_direction() - 90.0).abs() < 1e-9);
    let mut pt = Coord::steps(4, 0);
    rot.apply_forward(&mut pt);
    assert_eq!(pt, Coord::steps(0, -4));
    assert!((rot.motion_direction() - 180.0).abs() < 1e-9);

    let back = Command::rotate(4, Coord::ZERO, 64.0, 0.0, 90.0, true);
    assert!((back.real_direction() - 270.0).abs() < 1e-9);
}

#[test]
fn destination_does_not_disturb_cursor() {
    let mut cmd = Command::movement(4, Coord::steps(4, 0));
    let mut pt = Coord::ZERO;
    cmd.begin(&mut pt);
    cmd.next_beat(&mut pt);
    assert_eq!(cmd.destination(Coord::steps(1, 1)), Coord::steps(5, 1));
    assert_eq!(cmd.cursor(), 1);
}
