mod tests {
    use lamp_composer::color::{BLACK, Color, WHITE, blend_colors, fade, fade_linear, rgbw, rgbw_from_u32, white};

    const RED: Color = rgbw(255, 0, 0, 0);
    const BLUE: Color = rgbw(0, 0, 255, 0);

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(RED, BLUE, 0), RED);
        assert_eq!(blend_colors(RED, BLUE, 255), BLUE);
        assert_eq!(blend_colors(RED, BLUE, 128), rgbw(127, 0, 128, 0));
        assert_eq!(blend_colors(BLACK, WHITE, 128), rgbw(128, 128, 128, 128));
        assert_eq!(blend_colors(WHITE, BLACK, 255), BLACK);
    }

    #[test]
    fn test_rgbw_from_u32() {
        let color = rgbw_from_u32(0x1122_3344);
        assert_eq!(color, rgbw(0x11, 0x22, 0x33, 0x44));
        assert_eq!(white(color), 0x44);
    }

    #[test]
    fn test_fade_linear_boundaries() {
        let from = rgbw(10, 20, 30, 40);
        let to = rgbw(200, 100, 0, 250);

        assert_eq!(fade_linear(from, to, 100, 0), from);
        assert_eq!(fade_linear(from, to, 100, 100), to);
        assert_eq!(fade_linear(from, to, 100, 150), to);
        assert_eq!(fade_linear(from, to, 0, 5), to);
        assert_eq!(fade_linear(from, to, 0, 0), from);
    }

    #[test]
    fn test_fade_linear_midpoint() {
        let to = rgbw(200, 100, 0, 50);
        assert_eq!(fade_linear(BLACK, to, 100, 50), rgbw(100, 50, 0, 25));
        assert_eq!(fade_linear(to, BLACK, 2, 1), rgbw(100, 50, 0, 25));
    }

    #[test]
    fn test_fade_linear_rounds_to_nearest() {
        // 255 * 1 / 100 = 2.55
        assert_eq!(fade_linear(BLACK, WHITE, 100, 1), rgbw(3, 3, 3, 3));
        assert_eq!(fade_linear(WHITE, BLACK, 100, 1), rgbw(252, 252, 252, 252));
    }

    #[test]
    fn test_fade_linear_stays_between_ends() {
        let from = rgbw(250, 3, 128, 0);
        let to = rgbw(5, 240, 128, 255);

        for step in 0..=60 {
            let color = fade_linear(from, to, 60, step);
            assert!(color.r <= from.r && color.r >= to.r);
            assert!(color.g >= from.g && color.g <= to.g);
            assert_eq!(color.b, 128);
            assert!(white(color) >= white(from) && white(color) <= white(to));
        }
    }

    #[test]
    fn test_fade_same_color() {
        let color = rgbw(17, 99, 201, 3);
        for step in 0..=10 {
            assert_eq!(fade_linear(color, color, 10, step), color);
            assert_eq!(fade(color, color, 10, step), color);
        }
    }

    #[test]
    fn test_fade_boundaries() {
        assert_eq!(fade(RED, BLUE, 60, 0), RED);
        assert_eq!(fade(RED, BLUE, 60, 60), BLUE);
        assert_eq!(fade(RED, BLUE, 60, 90), BLUE);
        assert_eq!(fade(RED, BLUE, 0, 0), RED);
    }

    #[test]
    fn test_fade_is_monotonic() {
        let mut previous = 0;
        for frame in 0..=30 {
            let level = fade(BLACK, WHITE, 30, frame).r;
            assert!(level >= previous, "frame {frame}: {level} < {previous}");
            previous = level;
        }
        assert_eq!(previous, 255);
    }
}
