use foundation::time::Millis;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::OpacityError;
use crate::layer::LayerKind;
use crate::symbology::{PaintTransition, PaintValue, transition_property};

/// Fade a style layer to `opacity`, optionally animated over `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerOpacityInstruction {
    pub layer: String,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Millis>,
}

impl LayerOpacityInstruction {
    pub fn new(layer: impl Into<String>, opacity: f64) -> Self {
        Self {
            layer: layer.into(),
            opacity,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Millis) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.layer.is_empty() {
            return Err("opacity instruction has an empty layer id".to_string());
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!(
                "opacity {} for layer `{}` outside 0.0..=1.0",
                self.opacity, self.layer
            ));
        }
        Ok(())
    }
}

/// The slice of a map's style API that opacity changes need.
pub trait PaintSurface {
    /// Type string of the style layer (`getLayer(id).type`), `None` if absent.
    fn layer_type(&self, layer: &str) -> Option<String>;

    fn set_paint_property(&mut self, layer: &str, property: &str, value: PaintValue);
}

/// Applies [`LayerOpacityInstruction`]s to every opacity channel of a layer.
#[derive(Debug, Default, Copy, Clone)]
pub struct OpacityTransitioner;

impl OpacityTransitioner {
    pub fn new() -> Self {
        Self
    }

    pub fn layer_kind<S: PaintSurface + ?Sized>(
        &self,
        surface: &S,
        layer: &str,
    ) -> Result<LayerKind, OpacityError> {
        let kind = surface
            .layer_type(layer)
            .ok_or_else(|| OpacityError::UnknownLayer(layer.to_string()))?;
        LayerKind::from_style_type(&kind).ok_or_else(|| OpacityError::UnsupportedLayerType {
            layer: layer.to_string(),
            kind,
        })
    }

    /// Sets every opacity property of the layer's kind to the target value.
    ///
    /// With a duration, each property first gets a transition (zero delay) so
    /// the change animates instead of jumping.
    pub fn apply<S: PaintSurface + ?Sized>(
        &self,
        surface: &mut S,
        instruction: &LayerOpacityInstruction,
    ) -> Result<(), OpacityError> {
        let kind = self.layer_kind(surface, &instruction.layer)?;
        for property in kind.opacity_properties() {
            if let Some(duration) = instruction.duration {
                surface.set_paint_property(
                    &instruction.layer,
                    &transition_property(property),
                    PaintValue::Transition(PaintTransition::over(duration)),
                );
            }
            surface.set_paint_property(
                &instruction.layer,
                property,
                PaintValue::Number(instruction.opacity),
            );
        }
        trace!(
            layer = %instruction.layer,
            %kind,
            opacity = instruction.opacity,
            "applied opacity"
        );
        Ok(())
    }

    /// Applies instructions in order, stopping at the first failure.
    pub fn apply_all<S: PaintSurface + ?Sized>(
        &self,
        surface: &mut S,
        instructions: &[LayerOpacityInstruction],
    ) -> Result<(), OpacityError> {
        for instruction in instructions {
            self.apply(surface, instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use foundation::time::Millis;
    use pretty_assertions::assert_eq;

    use super::{LayerOpacityInstruction, OpacityTransitioner, PaintSurface};
    use crate::error::OpacityError;
    use crate::layer::LayerKind;
    use crate::symbology::{PaintTransition, PaintValue};

    #[derive(Default)]
    struct FakeStyle {
        types: BTreeMap<String, String>,
        calls: Vec<(String, String, PaintValue)>,
        paint: BTreeMap<(String, String), PaintValue>,
    }

    impl FakeStyle {
        fn with_layer(mut self, id: &str, kind: &str) -> Self {
            self.types.insert(id.to_string(), kind.to_string());
            self
        }

        fn paint(&self, layer: &str, property: &str) -> Option<PaintValue> {
            self.paint
                .get(&(layer.to_string(), property.to_string()))
                .copied()
        }
    }

    impl PaintSurface for FakeStyle {
        fn layer_type(&self, layer: &str) -> Option<String> {
            self.types.get(layer).cloned()
        }

        fn set_paint_property(&mut self, layer: &str, property: &str, value: PaintValue) {
            self.calls
                .push((layer.to_string(), property.to_string(), value));
            self.paint
                .insert((layer.to_string(), property.to_string()), value);
        }
    }

    #[test]
    fn every_channel_reads_target_for_every_kind() {
        for kind in LayerKind::ALL {
            let mut style = FakeStyle::default().with_layer("l", kind.style_type());
            OpacityTransitioner::new()
                .apply(&mut style, &LayerOpacityInstruction::new("l", 0.3))
                .unwrap();
            for property in kind.opacity_properties() {
                assert_eq!(style.paint("l", property), Some(PaintValue::Number(0.3)));
            }
        }
    }

    #[test]
    fn duration_sets_transition_before_value() {
        let mut style = FakeStyle::default().with_layer("water", "fill");
        let instruction = LayerOpacityInstruction::new("water", 0.0).with_duration(Millis(1000));
        OpacityTransitioner::new()
            .apply(&mut style, &instruction)
            .unwrap();

        assert_eq!(
            style.calls,
            vec![
                (
                    "water".to_string(),
                    "fill-opacity-transition".to_string(),
                    PaintValue::Transition(PaintTransition::over(Millis(1000))),
                ),
                (
                    "water".to_string(),
                    "fill-opacity".to_string(),
                    PaintValue::Number(0.0),
                ),
            ]
        );
    }

    #[test]
    fn symbol_fades_icon_and_text_together() {
        let mut style = FakeStyle::default().with_layer("poi-labels", "symbol");
        let instruction =
            LayerOpacityInstruction::new("poi-labels", 1.0).with_duration(Millis(250));
        OpacityTransitioner::new()
            .apply(&mut style, &instruction)
            .unwrap();

        let properties: Vec<_> = style.calls.iter().map(|(_, p, _)| p.as_str()).collect();
        assert_eq!(
            properties,
            vec![
                "icon-opacity-transition",
                "icon-opacity",
                "text-opacity-transition",
                "text-opacity",
            ]
        );
    }

    #[test]
    fn reapplying_converges_to_same_opacity() {
        let mut style = FakeStyle::default().with_layer("roads", "line");
        let instruction = LayerOpacityInstruction::new("roads", 0.6);
        let t = OpacityTransitioner::new();
        t.apply(&mut style, &instruction).unwrap();
        let once = style.paint("roads", "line-opacity");
        t.apply(&mut style, &instruction).unwrap();
        assert_eq!(style.paint("roads", "line-opacity"), once);
    }

    #[test]
    fn missing_layer_is_an_error() {
        let mut style = FakeStyle::default();
        let err = OpacityTransitioner::new()
            .apply(&mut style, &LayerOpacityInstruction::new("ghost", 1.0))
            .unwrap_err();
        assert_eq!(err, OpacityError::UnknownLayer("ghost".to_string()));
        assert!(style.calls.is_empty());
    }

    #[test]
    fn layer_without_opacity_channel_is_an_error() {
        let mut style = FakeStyle::default().with_layer("sky", "sky");
        let err = OpacityTransitioner::new()
            .apply(&mut style, &LayerOpacityInstruction::new("sky", 1.0))
            .unwrap_err();
        assert!(matches!(err, OpacityError::UnsupportedLayerType { .. }));
    }

    #[test]
    fn apply_all_stops_at_first_failure() {
        let mut style = FakeStyle::default().with_layer("a", "fill");
        let instructions = vec![
            LayerOpacityInstruction::new("a", 1.0),
            LayerOpacityInstruction::new("missing", 1.0),
            LayerOpacityInstruction::new("a", 0.0),
        ];
        let err = OpacityTransitioner::new()
            .apply_all(&mut style, &instructions)
            .unwrap_err();
        assert_eq!(err, OpacityError::UnknownLayer("missing".to_string()));
        assert_eq!(style.paint("a", "fill-opacity"), Some(PaintValue::Number(1.0)));
    }

    #[test]
    fn rejects_out_of_range_opacity() {
        assert!(LayerOpacityInstruction::new("a", 1.2).validate().is_err());
        assert!(LayerOpacityInstruction::new("a", f64::NAN).validate().is_err());
        assert!(LayerOpacityInstruction::new("", 0.5).validate().is_err());
        assert!(LayerOpacityInstruction::new("a", 0.5).validate().is_ok());
    }
}
