use crate::app::context::Context;
use crate::app::hooks::ExecutionResult;
use crate::configuration::step::{ButtonPress, DelegateResolution};
use crate::device::model::DeviceModel;
use crate::device::snapshot::ButtonEvent;

pub(crate) fn sleep(ctx: &mut Context, ms: u64) -> ExecutionResult {
    ctx.advance(ms);
    Ok(format!("slept {} ms", ms))
}

pub(crate) fn scan_card(
    model: &mut DeviceModel,
    ctx: &mut Context,
    registrant_id: u64,
) -> ExecutionResult {
    let card = ctx.scan(registrant_id)?;
    model.scan_card(card, ctx.group_of(card))?;
    Ok(format!("scanned {} ({})", card.name, card.wca_id))
}

pub(crate) fn reset_state(model: &mut DeviceModel) -> ExecutionResult {
    model.reset_state();
    Ok("state reset".to_owned())
}

pub(crate) fn solve_time(model: &mut DeviceModel, ms: u64) -> ExecutionResult {
    model.set_solve_time(ms);
    Ok(format!("solve time {} ms", ms))
}

pub(crate) fn solve_time_rng(model: &mut DeviceModel, ctx: &mut Context) -> ExecutionResult {
    let ms = ctx.draw_time();
    model.set_solve_time(ms);
    Ok(format!("random solve time {} ms", ms))
}

/// Holds the button for `press.time` logical milliseconds; the action fires
/// on release.
pub(crate) fn press(
    model: &mut DeviceModel,
    ctx: &mut Context,
    press: &ButtonPress,
) -> ExecutionResult {
    let action = ctx.bind(&press.name)?;
    let pressed_at = ctx.now();
    ctx.advance(press.time);
    ctx.record_press(ButtonEvent {
        name: press.name.clone(),
        action,
        pressed_at,
        held_ms: press.time,
    });
    model.press_button(action, ctx.outbox_mut())?;
    Ok(format!(
        "pressed '{}' ({:?}) for {} ms",
        press.name, action, press.time
    ))
}

pub(crate) fn delegate_resolve(
    model: &mut DeviceModel,
    ctx: &mut Context,
    resolution: &DelegateResolution,
) -> ExecutionResult {
    let message = model.resolve_delegate(
        resolution.should_scan_cards,
        resolution.penalty,
        resolution.value,
        ctx.outbox_mut(),
    )?;
    Ok(format!("delegate resolved, sent {}", message))
}
