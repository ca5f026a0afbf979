//! Integration tests for voxa crates.
//!
//! End-to-end checks of the combine and smoothing engines through the
//! public APIs of `voxa-core` and `voxa-ops`, plus table-driven combine
//! cases loaded from YAML (see [`cases`]).

pub mod cases;

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use voxa_core::{AnyVolume, Axis, PixelType, Result, Shape, SliceView, Volume, VolumeStorage};
    use voxa_ops::combine::{self, CombineOp};
    use voxa_ops::smooth::{self, IirCoefficients};

    fn filled_u8(shape: Shape, v: u8) -> Volume<u8> {
        Volume::filled(shape, v).unwrap()
    }

    #[test]
    fn test_max_then_min_sequence() {
        let shape = Shape::cube(4);
        let mut owner = filled_u8(shape, 5);
        combine::max(&mut owner, &filled_u8(shape, 9)).unwrap();
        assert!(owner.iter().all(|v| v == 9));
        combine::min(&mut owner, &filled_u8(shape, 3)).unwrap();
        assert!(owner.iter().all(|v| v == 3));
    }

    #[test]
    fn test_add_subtract_wraparound() {
        let shape = Shape::new(5, 3, 2);
        let mut owner = filled_u8(shape, 250);
        let ten = filled_u8(shape, 10);
        combine::add(&mut owner, &ten).unwrap();
        assert!(owner.iter().all(|v| v == 4));
        combine::subtract(&mut owner, &ten).unwrap();
        assert!(owner.iter().all(|v| v == 250));
    }

    #[test]
    fn test_divide_by_zero_keeps_earlier_samples() {
        let shape = Shape::new(2, 2, 3);
        let mut owner = filled_u8(shape, 90);
        let mut divisor: Volume<f64> = Volume::filled(shape, 3.0).unwrap();
        divisor.set(0, 1, 2, 0.4); // truncates to 0

        let err = combine::divide(&mut owner, &divisor).unwrap_err();
        assert!(err.is_divide_by_zero());
        assert!(owner.slice(0).iter().all(|&v| v == 30));
        assert!(owner.slice(1).iter().all(|&v| v == 30));
        assert_eq!(owner.slice(2), &[30, 30, 90, 90]);
    }

    #[test]
    fn test_shape_mismatch_leaves_owner() {
        let mut owner = filled_u8(Shape::cube(4), 17);
        let before = owner.clone();
        let operands: Vec<AnyVolume> = PixelType::ALL
            .iter()
            .map(|&k| AnyVolume::filled(Shape::new(4, 4, 5), k, 1.0).unwrap())
            .collect();
        for operand in &operands {
            for op in CombineOp::ALL {
                let err = combine::combine(&mut owner, operand, op).unwrap_err();
                assert!(err.is_shape_mismatch());
                let msg = err.to_string();
                assert!(msg.contains("[4,4,4]") && msg.contains("[4,4,5]"), "{msg}");
            }
        }
        assert_eq!(owner, before);
    }

    /// Foreign storage with a representation tag outside the known set.
    struct Tagged {
        inner: Volume<u8>,
        tag: u32,
    }

    impl VolumeStorage for Tagged {
        fn shape(&self) -> Shape {
            self.inner.shape()
        }
        fn type_code(&self) -> u32 {
            self.tag
        }
        fn slice_view(&self, z: usize) -> Result<SliceView<'_>> {
            self.inner.slice_view(z)
        }
        fn get_line(&self, axis: Axis, a: usize, b: usize, out: &mut [f64]) -> Result<()> {
            self.inner.get_line(axis, a, b, out)
        }
        fn put_line(&mut self, axis: Axis, a: usize, b: usize, line: &[f64]) -> Result<()> {
            self.inner.put_line(axis, a, b, line)
        }
    }

    #[test]
    fn test_representation_tag_checked_before_mutation() {
        let shape = Shape::cube(3);
        let mut owner = filled_u8(shape, 2);
        let operand = Tagged {
            inner: filled_u8(shape, 1),
            tag: 5,
        };
        let err = combine::add(&mut owner, &operand).unwrap_err();
        assert!(err.is_unsupported_representation());
        assert!(owner.iter().all(|v| v == 2));

        // Known tag: the same storage works
        let operand = Tagged { tag: 1, ..operand };
        combine::add(&mut owner, &operand).unwrap();
        assert!(owner.iter().all(|v| v == 3));
    }

    #[test]
    fn test_non_positive_sigma_identity_all_types() {
        let shape = Shape::new(6, 5, 4);
        for kind in PixelType::ALL {
            let mut vol =
                AnyVolume::from_fn(shape, kind, |x, y, z| (x * 40 + y * 3 + z) as f64).unwrap();
            let before = vol.clone();
            smooth::smooth_gaussian(&mut vol, 0.0, 0.0, -3.0).unwrap();
            assert_eq!(vol, before, "{kind}");
        }
    }

    #[test]
    fn test_single_voxel_any_sigma() {
        for sigma in [0.5, 2.0, 50.0] {
            let mut vol: Volume<f32> = Volume::filled(Shape::cube(1), 12.5).unwrap();
            smooth::smooth_gaussian_uniform(&mut vol, sigma).unwrap();
            assert_eq!(vol.get(0, 0, 0), 12.5);
        }
    }

    #[test]
    fn test_sigma_two_coefficients() {
        let c = IirCoefficients::from_sigma(2.0);
        assert_abs_diff_eq!(c.b0, 1.75 - 33f64.sqrt() / 4.0, epsilon = 1e-9);
        assert_eq!(c.as_array(), [c.b0; 3]);
    }

    #[test]
    fn test_flat_axes_skipped() {
        // 1-voxel-thick volume: only X and Y are filtered
        let shape = Shape::new(8, 8, 1);
        let mut vol = Volume::<f64>::from_fn(shape, |x, y, _| (x * y) as f64).unwrap();
        let mut xy_only = vol.clone();
        smooth::smooth_gaussian(&mut vol, 1.0, 1.0, 9.0).unwrap();
        smooth::smooth_gaussian(&mut xy_only, 1.0, 1.0, 0.0).unwrap();
        assert_eq!(vol, xy_only);
    }

    #[test]
    fn test_smooth_then_combine() {
        let shape = Shape::new(16, 16, 4);
        let mut density =
            Volume::<f32>::from_fn(shape, |x, _, _| if x < 8 { 0.0 } else { 100.0 }).unwrap();
        smooth::smooth_gaussian(&mut density, 2.0, 0.0, 0.0).unwrap();

        // Edge is blurred but monotone along X
        let row = density.line(Axis::X, 3, 1).unwrap();
        assert!(row.windows(2).all(|w| w[0] <= w[1] + 1e-4));
        assert!(row[7] > 0.0 && row[8] < 100.0);

        let mut mask: Volume<u8> = Volume::new(shape).unwrap();
        combine::max(&mut mask, &density).unwrap();
        for x in 0..16 {
            assert_eq!(mask.get(x, 3, 1), density.get(x, 3, 1) as i32 as u8);
        }
    }

    #[test]
    fn test_parallel_engine_agrees() {
        use voxa_ops::parallel;

        let shape = Shape::new(17, 13, 9);
        let mut a = Volume::<i16>::from_fn(shape, |x, y, z| {
            (x as i32 * 97 + y as i32 * 31 - z as i32 * 200) as i16
        })
        .unwrap();
        let mut b = a.clone();
        smooth::smooth_gaussian(&mut a, 1.2, 0.7, 2.2).unwrap();
        parallel::smooth_gaussian(&mut b, 1.2, 0.7, 2.2).unwrap();
        assert_eq!(a, b);

        let mut m1 = Volume::<u8>::from_fn(shape, |x, y, z| (x ^ y ^ z) as u8).unwrap();
        let mut m2 = m1.clone();
        combine::multiply(&mut m1, &a).unwrap();
        parallel::combine(&mut m2, &a, CombineOp::Multiply).unwrap();
        assert_eq!(m1, m2);
    }
}
