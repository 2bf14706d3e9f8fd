//! # 序列时序集成测试
//!
//! 通过引擎驱动序列，验证等待、覆盖层清理和命令顺序。

mod common;

use std::sync::Arc;

use arcane_runtime::{Engine, EngineConfig, Position, Rect, Sequence};

use common::{MockStage, ms, registry_with_probe};

fn engine() -> Engine<MockStage> {
    let stage = MockStage::new(1000.0, 800.0)
        .with_element("#card", Rect::new(10.0, 10.0, 100.0, 100.0), vec!["card"]);
    Engine::new(
        stage,
        Arc::new(registry_with_probe()),
        EngineConfig::default().with_seed(1),
    )
}

/// 以 16ms 步长推进到序列结束，返回结束帧的时刻（毫秒）
fn run_to_completion(engine: &mut Engine<MockStage>) -> u64 {
    let mut now = engine.clock().as_millis() as u64;
    while engine.runner_count() > 0 {
        now += 16;
        let report = engine.frame(ms(now));
        if !report.finished_runners.is_empty() {
            break;
        }
        assert!(now < 60_000, "序列没有结束");
    }
    now
}

#[test]
fn test_wait_completes_and_clears_overlay() {
    let mut engine = engine();
    let sequence = Sequence::from_json(r#"[["WAIT", 50]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));
    assert_eq!(engine.runner_count(), 1);

    let finished_at = run_to_completion(&mut engine);
    assert!(finished_at >= 50);
    assert_eq!(finished_at, 64);
    assert_eq!(engine.runner_count(), 0);
    assert_eq!(engine.stage().overlay, "transparent");
    assert_eq!(engine.stage().log, vec!["overlay:transparent"]);
}

#[test]
fn test_sustained_black_until_cleanup() {
    let mut engine = engine();
    let sequence = Sequence::from_json(r#"[["IMPACT_FRAME", 100, "black", "none"], ["WAIT", 0]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));
    assert_eq!(engine.stage().overlay, "black");

    engine.frame(ms(96));
    assert_eq!(engine.stage().overlay, "black");

    run_to_completion(&mut engine);
    // 黑色只在最终清理时被清除一次
    assert_eq!(engine.stage().log, vec!["overlay:black", "overlay:transparent"]);
}

#[test]
fn test_partial_black_prefix_sustained() {
    let mut engine = engine();
    let sequence =
        Sequence::from_json(r#"[["IMPACT_FRAME", 30, "RGBA(0, 0, 0, 0.8)", "none"], ["WAIT", 100]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));

    engine.frame(ms(64));
    assert_eq!(engine.stage().overlay, "RGBA(0, 0, 0, 0.8)");
}

#[test]
fn test_tinted_impact_clears_after_delay() {
    let mut engine = engine();
    let sequence =
        Sequence::from_json(r#"[["IMPACT_FRAME", 50, "rgba(10,10,10,0.5)", "none"], ["WAIT", 500]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));
    assert_eq!(engine.stage().overlay, "rgba(10,10,10,0.5)");

    engine.frame(ms(48));
    assert_eq!(engine.stage().overlay, "rgba(10,10,10,0.5)");
    engine.frame(ms(64));
    assert_eq!(engine.stage().overlay, "transparent");
    assert_eq!(engine.runner_count(), 1);
}

#[test]
fn test_ten_commands_in_order() {
    let mut engine = engine();
    let sequence = Sequence::from_json(
        r##"[
            ["VFX", 40, "probe", 10, 10],
            ["IMPACT_FRAME", 30, "#111111", "blur"],
            ["VFX", 0, "probe", 20, 10],
            ["SHADOW", 50, ".card", "#00ffff"],
            ["WAIT", 20],
            ["VFX", 10, "probe", 30, 10],
            ["IMPACT_FRAME", 25, "black", "none"],
            ["VFX", 15, "probe", 40, 10],
            ["WAIT", 60],
            ["VFX", 0, "probe", 50, 10]
        ]"##,
    )
    .unwrap();
    assert_eq!(sequence.len(), 10);
    let total = sequence.total_delay().as_millis() as u64;
    assert_eq!(total, 250);

    engine.run_sequence(sequence, Position::center(), ms(0));
    let finished_at = run_to_completion(&mut engine);
    assert!(finished_at >= total);

    // 每个 VFX 恰好生成一次，按声明顺序
    let centers: Vec<f32> = (1..=5)
        .map(|id| {
            let frame = engine.effect(arcane_runtime::EffectId::new(id)).unwrap().frame();
            frame.x + frame.width / 2.0
        })
        .collect();
    assert_eq!(centers, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    assert_eq!(engine.global_count(), 5);

    assert_eq!(
        engine.stage().log,
        vec![
            "screen:blur",
            "overlay:#111111",
            "screen-clear:blur",
            "overlay:transparent",
            "shadow:#00ffff",
            "overlay:black",
            "overlay:transparent",
        ]
    );
}

#[test]
fn test_vfx_without_coordinates_uses_anchor() {
    let mut engine = engine();
    let sequence = Sequence::from_json(r#"[["VFX", 0, "probe"]]"#).unwrap();
    engine.run_sequence(sequence, Position::new("25%", "75%"), ms(0));

    let frame = engine.effect(arcane_runtime::EffectId::new(1)).unwrap().frame();
    assert_eq!(frame.x + frame.width / 2.0, 250.0);
    assert_eq!(frame.y + frame.height / 2.0, 600.0);
}

#[test]
fn test_unknown_command_does_not_wait() {
    let mut engine = engine();
    let sequence = Sequence::from_json(r#"[["EXPLODE", 5000], ["VFX", 0, "probe"]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));

    assert_eq!(engine.global_count(), 1);
    let report = engine.frame(ms(16));
    assert_eq!(report.finished_runners.len(), 1);
}

#[test]
fn test_concurrent_runners_share_overlay() {
    let mut engine = engine();
    let first = Sequence::from_json(r##"[["IMPACT_FRAME", 100, "#ff0000", "none"]]"##).unwrap();
    let second = Sequence::from_json(r##"[["WAIT", 20], ["IMPACT_FRAME", 100, "#0000ff", "none"]]"##).unwrap();
    engine.run_sequence(first, Position::center(), ms(0));
    engine.run_sequence(second, Position::center(), ms(0));
    assert_eq!(engine.runner_count(), 2);

    engine.frame(ms(32));
    // 后写入者生效
    assert_eq!(engine.stage().overlay, "#0000ff");

    let mut finished = 0;
    let mut now = 32;
    while finished < 2 {
        now += 16;
        finished += engine.frame(ms(now)).finished_runners.len();
    }
    assert!(now >= 120);
    assert_eq!(engine.stage().overlay, "transparent");
}

#[test]
fn test_late_frame_keeps_impact_hold() {
    let mut engine = engine();
    let sequence = Sequence::from_json(r#"[["WAIT", 10], ["IMPACT_FRAME", 50, "red", "none"], ["WAIT", 10]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));

    // 这一帧迟到很久，冲击帧从这里开始保持 50ms
    engine.frame(ms(200));
    assert_eq!(engine.stage().overlay, "red");
    engine.frame(ms(240));
    assert_eq!(engine.stage().overlay, "red");
    engine.frame(ms(250));
    assert_eq!(engine.stage().overlay, "transparent");
    assert_eq!(engine.runner_count(), 1);
}

#[test]
fn test_launch_between_frames_uses_call_time() {
    let mut engine = engine();
    engine.frame(ms(16));
    engine.frame(ms(32));

    let sequence = Sequence::from_json(r#"[["IMPACT_FRAME", 20, "red", "shake"]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(40));
    assert_eq!(engine.stage().log, vec!["screen:shake", "overlay:red"]);

    // 从 40ms 起算，52ms 时还没到期
    engine.frame(ms(56));
    assert_eq!(engine.stage().overlay, "red");
    assert_eq!(engine.stage().log.len(), 2);

    engine.frame(ms(60));
    assert_eq!(engine.stage().log[2..], ["screen-clear:shake", "overlay:transparent", "overlay:transparent"]);
}

#[test]
fn test_malformed_entry_skipped_at_runtime() {
    let mut engine = engine();
    let sequence = Sequence::from_json(r#"["oops", [], [42, 500], ["VFX", 0, "probe"]]"#).unwrap();
    engine.run_sequence(sequence, Position::center(), ms(0));

    // 格式错误的条目不等待，后面的命令照常执行
    assert_eq!(engine.global_count(), 1);
    let report = engine.frame(ms(16));
    assert_eq!(report.finished_runners.len(), 1);
}
