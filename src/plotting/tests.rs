#[cfg(test)]
mod tests {
    use super::super::animation::{equal_aspect_ranges, frame_area, selected_frames, speed_color};
    use super::super::charts::connecting_line;
    use super::super::*;
    use crate::analysis::{
        fit_diffusion, fit_inverse_area, AreaPoint, MsdSeries, PressureAreaStudy, PressureSeries,
        StationaryPressure,
    };
    use crate::error::AnalysisError;
    use crate::geometry::Container;
    use crate::io::{Frame, Trajectory};
    use plotters::prelude::{BitMapBackend, ChartBuilder, IntoDrawingArea};
    use std::path::Path;
    use tempfile::TempDir;
    use ultraviolet::DVec2;

    fn container() -> Container {
        Container {
            channel_width: 0.05,
            radius: 0.0015,
            box1_width: 0.09,
            box2_width: 0.09,
            box1_height: 0.09,
        }
    }

    fn study() -> PressureAreaStudy {
        let point = |l: f64, area: f64, p: f64| AreaPoint {
            channel_width: l,
            area,
            pressure: StationaryPressure {
                left: p,
                right: p,
                left_std: 0.01,
                right_std: 0.03,
                average: p,
                average_std: 0.02,
                bins: 5,
            },
        };
        PressureAreaStudy {
            points: vec![point(0.03, 0.0104, 1.25), point(0.09, 0.0152, 0.8)],
            inverse_area_fit: None,
        }
    }

    /// Three runs given out of order, on the `P = k/A` line.
    fn unordered_points() -> Vec<AreaPoint> {
        [0.07, 0.03, 0.05]
            .iter()
            .map(|&l| {
                let area = 0.0079 + 0.09 * (l - 0.0015);
                let average = 0.002 / area;
                AreaPoint {
                    channel_width: l,
                    area,
                    pressure: StationaryPressure {
                        left: average,
                        right: average,
                        left_std: 0.01,
                        right_std: 0.01,
                        average,
                        average_std: 0.01,
                        bins: 4,
                    },
                }
            })
            .collect()
    }

    /// Two particles crossing the left box, one frame per second.
    fn moving_trajectory(frames: usize) -> Trajectory {
        let frames = (0..frames)
            .map(|k| {
                let t = k as f64;
                let mut frame = Frame::new(t);
                frame.positions.push(DVec2::new(0.01 + 0.005 * t, 0.03));
                frame.velocities.push(DVec2::new(0.005, 0.0));
                frame.positions.push(DVec2::new(0.08 - 0.002 * t, 0.06));
                frame.velocities.push(DVec2::new(-0.002, 0.001));
                frame
            })
            .collect();
        Trajectory::from_frames(frames).unwrap()
    }

    fn assert_written(path: &Path) {
        let meta = std::fs::metadata(path).unwrap();
        assert!(meta.len() > 0, "{} is empty", path.display());
    }

    #[test]
    fn padded_range_widens_flat_and_empty_inputs() {
        assert_eq!(padded_range(Vec::<f64>::new().iter(), 0.1), (0.0, 1.0));
        let (lo, hi) = padded_range([2.0, 2.0].iter(), 0.0);
        assert!(lo < 2.0 && hi > 2.0);
        let (lo, hi) = padded_range([0.0, 10.0, f64::NAN].iter(), 0.1);
        assert!((lo + 1.0).abs() < 1e-12);
        assert!((hi - 11.0).abs() < 1e-12);
    }

    #[test]
    fn animation_ranges_keep_equal_scale() {
        let c = container();
        let ((x0, x1), (y0, y1)) = equal_aspect_ranges(&c, 1000, 600);
        let px_per_m_x = 1000.0 / (x1 - x0);
        let px_per_m_y = 600.0 / (y1 - y0);
        assert!((px_per_m_x - px_per_m_y).abs() / px_per_m_x < 1e-9);
        assert!(x0 < 0.0 && x1 > c.total_width());
        assert!(y0 < 0.0 && y1 > c.box1_height);
    }

    #[test]
    fn speed_colors_run_from_blue_to_red() {
        let slow = speed_color(0.0, 1.0);
        let fast = speed_color(1.0, 1.0);
        assert!(slow.2 > slow.0);
        assert!(fast.0 > fast.2);
        assert_eq!(speed_color(5.0, 0.0), slow);
    }

    #[test]
    fn stride_keeps_the_first_frame() {
        let frames = (0..10).map(|i| Frame::new(i as f64)).collect();
        let traj = Trajectory::from_frames(frames).unwrap();
        let times: Vec<f64> = selected_frames(&traj, 4).map(|f| f.time).collect();
        assert_eq!(times, vec![0.0, 4.0, 8.0]);
        assert_eq!(selected_frames(&traj, 0).count(), 10);
    }

    #[test]
    fn frame_delay_follows_fps() {
        let style = AnimationStyle { width: 10, height: 10, fps: 30, stride: 1 };
        assert_eq!(style.frame_delay_ms(), 33);
        let style = AnimationStyle { fps: 0, ..style };
        assert_eq!(style.frame_delay_ms(), 1000);
    }

    #[test]
    fn empty_inputs_do_not_create_images() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        let style = ChartStyle::default();
        let series = PressureSeries { dt: 2.0, times: vec![], left: vec![], right: vec![] };
        assert!(matches!(plot_pressure_vs_time(&path, &series, &style), Err(AnalysisError::Empty(_))));
        assert!(matches!(
            plot_pressure_vs_area(&path, &[], AreaAxis::Area, &style),
            Err(AnalysisError::Empty(_))
        ));
        let anim = AnimationStyle { width: 10, height: 10, fps: 30, stride: 1 };
        assert!(matches!(
            render_animation(&dir.path().join("a.gif"), &Trajectory::default(), &container(), &anim),
            Err(AnalysisError::Empty(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn pa_table_uses_three_decimals() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pa_table.csv");
        export_pa_table(&path, &study()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "L [m],A_total [m²],P_avg [Pa],P·A [Pa·m²]");
        assert_eq!(lines[1], "0.030,0.010,1.250,0.013");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn series_csv_has_one_row_per_bin() {
        let dir = TempDir::new().unwrap();
        let pressure = PressureSeries {
            dt: 2.0,
            times: vec![0.0, 2.0],
            left: vec![0.5, 0.25],
            right: vec![0.0, 1.0],
        };
        let path = dir.path().join("pressure.csv");
        export_pressure_csv(&path, &pressure).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().nth(2), Some("2,0.25,1"));

        let msd = MsdSeries { bin_size: 10, times: vec![4.5], msd: vec![0.001], std: vec![0.0002] };
        let path = dir.path().join("msd.csv");
        export_msd_csv(&path, &msd).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn study_json_lists_every_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        export_study_json(&path, &study()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["runs"].as_array().map(|a| a.len()), Some(2));
        assert!(value["inverse_area_fit"].is_null());
        assert_eq!(value["runs"][1]["channel_width"], 0.09);
    }

    #[test]
    fn pressure_and_msd_charts_are_written() {
        let dir = TempDir::new().unwrap();
        let style = ChartStyle { width: 400, height: 300, font_size: 12 };

        let pressure = PressureSeries {
            dt: 2.0,
            times: vec![0.0, 2.0, 4.0, 6.0],
            left: vec![0.4, 0.5, 0.45, 0.5],
            right: vec![0.0, 0.2, 0.35, 0.4],
        };
        let path = dir.path().join("pressure_vs_time.png");
        plot_pressure_vs_time(&path, &pressure, &style).unwrap();
        assert_written(&path);

        let times: Vec<f64> = (0..6).map(|i| 10.0 * i as f64 + 5.0).collect();
        let msd = MsdSeries {
            bin_size: 10,
            msd: times.iter().map(|t| 4.0e-5 * t).collect(),
            std: vec![1.0e-5; times.len()],
            times,
        };
        let fit = fit_diffusion(&msd, Some(20.0), None).unwrap();
        let path = dir.path().join("msd.png");
        plot_msd(&path, &msd, &fit, 20.0, &style).unwrap();
        assert_written(&path);
    }

    #[test]
    fn study_charts_are_written_for_both_axes() {
        let dir = TempDir::new().unwrap();
        let style = ChartStyle { width: 400, height: 300, font_size: 12 };
        let points = unordered_points();

        for (name, axis) in [("area.png", AreaAxis::Area), ("inverse.png", AreaAxis::InverseArea)] {
            let path = dir.path().join(name);
            plot_pressure_vs_area(&path, &points, axis, &style).unwrap();
            assert_written(&path);
        }

        let fit = fit_inverse_area(&points).unwrap();
        let path = dir.path().join("inverse_area_fit.png");
        plot_inverse_area_fit(&path, &points, &fit, &style).unwrap();
        assert_written(&path);
    }

    #[test]
    fn animation_honours_stride() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run").join("animation.gif");
        let style = AnimationStyle { width: 300, height: 200, fps: 10, stride: 4 };
        let rendered = render_animation(&path, &moving_trajectory(10), &container(), &style).unwrap();
        assert_eq!(rendered, 3);
        assert_written(&path);
    }

    #[test]
    fn container_keeps_square_pixels_below_the_caption() {
        let c = container();
        let (width, height) = (1000u32, 600u32);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        let area = frame_area(&root, "2D gas diffusion (L=0.05, t=0.0 s)").unwrap();
        let (w, h) = area.dim_in_pixel();
        assert!(h < height);

        let ((x0, x1), (y0, y1)) = equal_aspect_ranges(&c, w, h);
        let chart = ChartBuilder::on(&area).build_cartesian_2d(x0..x1, y0..y1).unwrap();
        let origin = chart.backend_coord(&(0.0, 0.0));
        let right = chart.backend_coord(&(c.box1_width, 0.0));
        let top = chart.backend_coord(&(0.0, c.box1_height));
        let box_w = right.0 - origin.0;
        let box_h = origin.1 - top.1;
        assert!((box_w - box_h).abs() <= 1, "left box is {}x{} px", box_w, box_h);
    }

    #[test]
    fn study_line_runs_in_increasing_x() {
        let points = unordered_points();
        for axis in [AreaAxis::Area, AreaAxis::InverseArea] {
            let line = connecting_line(&points, axis);
            assert_eq!(line.len(), 3);
            assert!(line.windows(2).all(|w| w[0].0 < w[1].0));
        }
        let by_area = connecting_line(&points, AreaAxis::Area);
        assert!((by_area[0].0 - points[1].area).abs() < 1e-15);
    }
}
