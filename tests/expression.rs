mod tests {
    use lamp_composer::color::{Color, WHITE, rgbw};
    use lamp_composer::config::{MAX_PALETTE, PARAM_INTERVAL_MAX, PARAM_INTERVAL_MIN};
    use lamp_composer::expression::{
        GlitchyExpression, PulseExpression, breath_intensity, next_palette_index, pulse_weight,
    };
    use lamp_composer::{ExpressionConfig, ExpressionId, ExpressionSlot, Parameters, SocialBehavior};

    const RED: Color = rgbw(255, 0, 0, 0);
    const GREEN: Color = rgbw(0, 255, 0, 0);

    #[test]
    fn test_breath_intensity() {
        assert_eq!(breath_intensity(0.0), 0);
        assert_eq!(breath_intensity(0.5), 100);
        assert_eq!(breath_intensity(1.0), 0);
        assert!((49..=50).contains(&breath_intensity(0.25)));
        assert!((49..=50).contains(&breath_intensity(0.75)));
    }

    #[test]
    fn test_breath_intensity_truncates() {
        // 0.5 - 0.5 * cos(0.2 * pi) = 0.0955
        assert_eq!(breath_intensity(0.1), 9);
    }

    #[test]
    fn test_palette_ping_pong() {
        let mut index = 0;
        let mut forward = true;
        let mut visited = Vec::new();
        for _ in 0..8 {
            (index, forward) = next_palette_index(index, forward, 3);
            visited.push(index);
        }
        assert_eq!(visited, [1, 2, 1, 0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_palette_ping_pong_small() {
        assert_eq!(next_palette_index(0, true, 1), (0, true));
        assert_eq!(next_palette_index(0, true, 0), (0, true));
        assert_eq!(next_palette_index(0, true, 2), (1, true));
        assert_eq!(next_palette_index(1, true, 2), (0, false));
        assert_eq!(next_palette_index(0, false, 2), (1, true));
    }

    #[test]
    fn test_palette_index_out_of_range() {
        assert_eq!(next_palette_index(5, true, 3), (1, false));
        assert_eq!(next_palette_index(5, false, 3), (1, false));
        assert_eq!(next_palette_index(usize::MAX, true, 2), (0, false));
    }

    #[test]
    fn test_pulse_weight() {
        assert_eq!(pulse_weight(0.0, 15), 100);
        assert_eq!(pulse_weight(0.4, 15), 100);
        assert_eq!(pulse_weight(7.5, 15), 75);
        assert_eq!(pulse_weight(15.0, 15), 0);
        assert_eq!(pulse_weight(16.0, 15), 0);

        let mut previous = 100;
        for tenth in 0..200u16 {
            let weight = pulse_weight(f32::from(tenth) / 10.0, 15);
            assert!(weight <= previous);
            previous = weight;
        }
    }

    #[test]
    fn test_pulse_speed_floor() {
        let config = ExpressionConfig::with_colors(&[RED]);
        assert_eq!(PulseExpression::from_config(&config, 10).ms_per_pixel(), 300);
        assert_eq!(PulseExpression::from_config(&config, 60).ms_per_pixel(), 100);
        assert_eq!(PulseExpression::from_config(&config, 0).ms_per_pixel(), 100);
    }

    #[test]
    fn test_glitchy_duration_normalization() {
        let mut parameters = Parameters::new();
        parameters.insert("durationMin", 0).unwrap();
        parameters.insert("durationMax", 100).unwrap();
        let glitchy = GlitchyExpression::from_config(&ExpressionConfig::new(&[], &parameters));
        assert_eq!(glitchy.duration_range(), (1, 3));

        let mut parameters = Parameters::new();
        parameters.insert("durationMin", 5).unwrap();
        parameters.insert("durationMax", 2).unwrap();
        let glitchy = GlitchyExpression::from_config(&ExpressionConfig::new(&[], &parameters));
        assert_eq!(glitchy.duration_range(), (5, 5));
    }

    #[test]
    fn test_social_ease_is_clamped() {
        let mut parameters = Parameters::new();
        parameters.insert("acknowledgeFrames", 10).unwrap();
        let social = SocialBehavior::from_config(&ExpressionConfig::new(&[], &parameters));
        assert_eq!(social.timing(), (10, 5));

        let social = SocialBehavior::from_config(&ExpressionConfig::with_colors(&[]));
        assert_eq!(social.timing(), (240, 60));
    }

    #[test]
    fn test_config_palette() {
        let colors = [RED; MAX_PALETTE + 3];
        let config = ExpressionConfig::with_colors(&colors);
        assert_eq!(config.palette().len(), MAX_PALETTE);

        let empty = ExpressionConfig::with_colors(&[]);
        assert!(empty.palette().is_empty());
        assert_eq!(empty.palette_or_white().as_slice(), [WHITE]);

        let config = ExpressionConfig::with_colors(&[GREEN, RED]);
        assert_eq!(config.palette_or_white().as_slice(), [GREEN, RED]);
    }

    #[test]
    fn test_config_parameters() {
        let mut parameters = Parameters::new();
        parameters.insert(PARAM_INTERVAL_MIN, 5).unwrap();
        let config = ExpressionConfig::new(&[], &parameters);

        assert_eq!(config.parameter(PARAM_INTERVAL_MIN, 1), 5);
        assert_eq!(config.parameter("missing", 7), 7);
        assert_eq!(config.optional_parameter("missing"), None);
        // Both bounds are needed
        assert!(config.auto_trigger().is_none());

        parameters.insert(PARAM_INTERVAL_MAX, 10).unwrap();
        let config = ExpressionConfig::new(&[], &parameters);
        assert!(config.auto_trigger().is_some());
    }

    #[test]
    fn test_expression_id_names() {
        for id in [
            ExpressionId::Breathing,
            ExpressionId::Glitchy,
            ExpressionId::Pulse,
            ExpressionId::Shifty,
            ExpressionId::Social,
        ] {
            assert_eq!(ExpressionId::parse_from_str(id.as_str()), Some(id));
        }
        assert_eq!(ExpressionId::parse_from_str("sparkle"), None);
    }

    #[test]
    fn test_slot_flags() {
        let config = ExpressionConfig::with_colors(&[RED]);
        let slot = |id: ExpressionId| -> ExpressionSlot<8> { id.to_slot(&config, 8) };

        assert!(slot(ExpressionId::Glitchy).is_exclusive());
        assert!(!slot(ExpressionId::Breathing).is_exclusive());
        assert!(!slot(ExpressionId::Pulse).is_exclusive());
        assert!(!slot(ExpressionId::Shifty).is_exclusive());
        assert!(!slot(ExpressionId::Social).is_exclusive());

        assert!(slot(ExpressionId::Breathing).allowed_in_home_mode());
        assert!(!slot(ExpressionId::Glitchy).allowed_in_home_mode());
        assert!(!slot(ExpressionId::Social).allowed_in_home_mode());

        assert_eq!(slot(ExpressionId::Shifty).id(), ExpressionId::Shifty);
    }
}
