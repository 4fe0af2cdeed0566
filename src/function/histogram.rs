//! Functions that set drawing directives on one histogram. Arguments are
//! separated by spaces.

use crate::args::{ArgError, RawArgs};
use crate::error::HedError;
use crate::target::Histogram;

use super::{Action, FunctionRegistry};

pub(super) fn registry() -> Result<FunctionRegistry<Histogram>, HedError> {
    Ok(FunctionRegistry::builder(' ')
        .register("norm", "norm [value=1]", norm)?
        .register("scale", "scale factor", scale)?
        .register("line_color", "line_color color", line_color)?
        .register("line_width", "line_width width", line_width)?
        .register("line_style", "line_style style", line_style)?
        .register("marker_color", "marker_color color", marker_color)?
        .register("marker_style", "marker_style style [size]", marker_style)?
        .register("fill_color", "fill_color color", fill_color)?
        .register("color", "color color", color)?
        .register("draw", "draw option", draw)?
        .register("yrange", "yrange min:max", yrange)?
        .register("ymin", "ymin value", ymin)?
        .register("ymax", "ymax value", ymax)?
        .build())
}

fn norm(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (value,) = args.bind_with_defaults(1, (1.0f64,))?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.normalize = Some(value);
    }))
}

fn scale(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (factor,) = args.bind::<(f64,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.scale = Some(factor);
    }))
}

fn line_color(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (color,) = args.bind::<(i16,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.line_color = Some(color);
    }))
}

fn line_width(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (width,) = args.bind::<(f32,)>()?;
    if width < 0.0 {
        return Err(ArgError::Invalid {
            message: format!("line width {width} is negative"),
        });
    }
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.line_width = Some(width);
    }))
}

fn line_style(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (style,) = args.bind::<(i16,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.line_style = Some(style);
    }))
}

fn marker_color(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (color,) = args.bind::<(i16,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.marker_color = Some(color);
    }))
}

fn marker_style(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (style, size) = args.bind_with_defaults(1, (0i16, None::<f32>))?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.marker_style = Some(style);
        if size.is_some() {
            histogram.style.marker_size = size;
        }
    }))
}

fn fill_color(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (color,) = args.bind::<(i16,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.fill_color = Some(color);
    }))
}

fn color(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (color,) = args.bind::<(i16,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.line_color = Some(color);
        histogram.style.marker_color = Some(color);
    }))
}

fn draw(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    // Draw options may contain spaces ("HIST SAME"), so take the raw text.
    let option = args.text().trim().to_string();
    if option.is_empty() {
        return Err(ArgError::TooFew {
            expected: 1,
            got: 0,
        });
    }
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.draw_option = Some(option.clone());
    }))
}

fn yrange(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (range,) = args.bind::<((f64, f64),)>()?;
    let (minimum, maximum) = range;
    if minimum > maximum {
        return Err(ArgError::Invalid {
            message: format!("empty range {minimum}:{maximum}"),
        });
    }
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.minimum = Some(minimum);
        histogram.style.maximum = Some(maximum);
    }))
}

fn ymin(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (value,) = args.bind::<(f64,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.minimum = Some(value);
    }))
}

fn ymax(args: RawArgs<'_>) -> Result<Action<Histogram>, ArgError> {
    let (value,) = args.bind::<(f64,)>()?;
    Ok(Box::new(move |histogram: &mut Histogram| {
        histogram.style.maximum = Some(value);
    }))
}

#[cfg(test)]
mod tests {
    use super::registry;
    use crate::args::ArgError;
    use crate::error::HedError;
    use crate::target::Histogram;

    fn apply(name: &str, args: &str) -> Histogram {
        let registry = registry().expect("histogram registry");
        let function = registry.make(name, args).expect("valid call");
        let mut histogram = Histogram::named("h");
        function.call(&mut histogram);
        histogram
    }

    #[test]
    fn norm_defaults_to_unit_area() {
        assert_eq!(apply("norm", "").style.normalize, Some(1.0));
        assert_eq!(apply("norm", "100").style.normalize, Some(100.0));
    }

    #[test]
    fn color_sets_line_and_marker() {
        let histogram = apply("color", "632");
        assert_eq!(histogram.style.line_color, Some(632));
        assert_eq!(histogram.style.marker_color, Some(632));
        assert_eq!(histogram.style.fill_color, None);
    }

    #[test]
    fn marker_size_is_optional() {
        let histogram = apply("marker_style", "20");
        assert_eq!(histogram.style.marker_style, Some(20));
        assert_eq!(histogram.style.marker_size, None);

        let histogram = apply("marker_style", "21 1.5");
        assert_eq!(histogram.style.marker_size, Some(1.5));
    }

    #[test]
    fn draw_keeps_whole_option_text() {
        assert_eq!(
            apply("draw", "HIST SAME").style.draw_option.as_deref(),
            Some("HIST SAME")
        );
    }

    #[test]
    fn yrange_sets_both_limits_and_rejects_empty_range() {
        let histogram = apply("yrange", "0:1.5");
        assert_eq!(histogram.style.minimum, Some(0.0));
        assert_eq!(histogram.style.maximum, Some(1.5));

        let registry = registry().expect("histogram registry");
        let error = registry.make("yrange", "2:1").expect_err("empty range");
        assert!(matches!(
            error,
            HedError::FunctionArguments {
                source: ArgError::Invalid { .. },
                ..
            }
        ));
    }

    #[test]
    fn arity_is_checked_at_construction() {
        let registry = registry().expect("histogram registry");
        let too_many = registry.make("scale", "1 2").expect_err("one argument");
        assert!(too_many.to_string().contains("too many arguments"));
        let too_few = registry.make("line_width", "").expect_err("width is required");
        assert!(too_few.to_string().contains("too few arguments"));
    }
}
