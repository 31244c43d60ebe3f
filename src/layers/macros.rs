//! Macros to reduce boilerplate in layer implementations

/// Implements the bookkeeping part of `OverlayLayer`
///
/// This generates implementations for:
/// - id(), name(), kind()
/// - z_index(), set_z_index()
/// - is_visible(), set_visible()
/// - set_bounds(), apply_transform(), frame()
/// - as_any(), as_any_mut()
///
/// The layer needs a `LayerProperties` field and a `LayerView` field.
///
/// Usage:
/// ```ignore
/// impl OverlayLayer for MyLayer {
///     impl_layer_trait!(properties, view);
///     fn refresh(&mut self, level: ZoomLevel) -> Result<()> { /* ... */ }
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($properties_field:ident, $view_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn kind(&self) -> $crate::layers::base::LayerKind {
            self.$properties_field.kind
        }

        fn z_index(&self) -> i32 {
            self.$properties_field.z_index
        }

        fn set_z_index(&mut self, z_index: i32) {
            self.$properties_field.z_index = z_index;
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }

        fn set_bounds(&mut self, bounds: $crate::core::bounds::Bounds) {
            self.$view_field.bounds = bounds;
        }

        fn apply_transform(&mut self, transform: $crate::core::transform::Transform) {
            self.$view_field.set_transform(transform);
        }

        fn frame(&self) -> &$crate::layers::base::LayerFrame {
            &self.$view_field.frame
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

/// Constructor taking an id and display name
#[macro_export]
macro_rules! impl_layer_constructor {
    ($kind:expr) => {
        pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
            let properties =
                $crate::layers::base::LayerProperties::new(id.into(), name.into(), $kind);
            Self::with_properties(properties)
        }
    };
}
