//! Functions that configure the canvas a group is drawn on. Arguments are
//! separated by commas.

use crate::args::{ArgError, RawArgs};
use crate::error::HedError;
use crate::target::{AxisSwitches, Canvas, Margins};

use super::{Action, FunctionRegistry, axis_letters};

pub(super) fn registry() -> Result<FunctionRegistry<Canvas>, HedError> {
    Ok(FunctionRegistry::builder(',')
        .register("log", "log axes[,on=true]", log)?
        .register(
            "margin",
            "margin [left=0.1,right=0.1,bottom=0.1,top=0.1]",
            margin,
        )?
        .register("ticks", "ticks axes[,on=true]", ticks)?
        .register("grid", "grid axes[,on=true]", grid)?
        .build())
}

fn margin(args: RawArgs<'_>) -> Result<Action<Canvas>, ArgError> {
    let default = Margins::default();
    let (left, right, bottom, top) = args.bind_with_defaults(
        4,
        (default.left, default.right, default.bottom, default.top),
    )?;
    for value in [left, right, bottom, top] {
        if !(0.0..1.0).contains(&value) {
            return Err(ArgError::Invalid {
                message: format!("margin {value} outside [0, 1)"),
            });
        }
    }
    Ok(Box::new(move |canvas: &mut Canvas| {
        canvas.margins = Margins {
            left,
            right,
            bottom,
            top,
        };
    }))
}

/// Bind `axes[,on]` and resolve the letters once, at construction.
fn switch(
    function: &str,
    args: RawArgs<'_>,
    allowed: &str,
) -> Result<(Vec<char>, bool), ArgError> {
    let (axes, on) = args.bind_with_defaults(1, (String::new(), true))?;
    let letters = axis_letters(function, &axes, allowed)?;
    Ok((letters, on))
}

fn set_axes(switches: &mut AxisSwitches, letters: &[char], on: bool) {
    for letter in letters {
        match letter {
            'x' => switches.x = on,
            'y' => switches.y = on,
            'z' => switches.z = on,
            _ => {}
        }
    }
}

fn log(args: RawArgs<'_>) -> Result<Action<Canvas>, ArgError> {
    let (letters, on) = switch("log", args, "xyz")?;
    Ok(Box::new(move |canvas: &mut Canvas| {
        set_axes(&mut canvas.log, &letters, on);
    }))
}

fn ticks(args: RawArgs<'_>) -> Result<Action<Canvas>, ArgError> {
    let (letters, on) = switch("ticks", args, "xy")?;
    Ok(Box::new(move |canvas: &mut Canvas| {
        set_axes(&mut canvas.ticks, &letters, on);
    }))
}

fn grid(args: RawArgs<'_>) -> Result<Action<Canvas>, ArgError> {
    let (letters, on) = switch("grid", args, "xy")?;
    Ok(Box::new(move |canvas: &mut Canvas| {
        set_axes(&mut canvas.grid, &letters, on);
    }))
}
