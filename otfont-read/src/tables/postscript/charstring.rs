//! Parsing for PostScript charstrings.

use super::{Error, Index, Number, Stack};
use crate::{
    types::{Fixed, Pen},
    Cursor,
};

/// Maximum nesting depth for subroutine calls.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const NESTING_DEPTH_LIMIT: u32 = 10;

/// Trait for processing commands resulting from charstring evaluation.
///
/// During processing, the path construction operators (see "4.1 Path
/// Construction Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=15>)
/// are simplified into the basic move, line, curve and close commands.
///
/// This also has optional callbacks for processing hint operators.
#[allow(unused_variables)]
pub trait CommandSink {
    // Path construction operators.
    fn move_to(&mut self, x: Fixed, y: Fixed);
    fn line_to(&mut self, x: Fixed, y: Fixed);
    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed);
    fn close(&mut self);
    // Hint operators.
    /// Horizontal stem hint at `y` with height `dy`.
    fn hstem(&mut self, y: Fixed, dy: Fixed) {}
    /// Vertical stem hint at `x` with width `dx`.
    fn vstem(&mut self, x: Fixed, dx: Fixed) {}
    /// Bitmask defining the hints that should be made active for the
    /// commands that follow.
    fn hint_mask(&mut self, mask: &[u8]) {}
    /// Bitmask defining the counter hints that should be made active for the
    /// commands that follow.
    fn counter_mask(&mut self, mask: &[u8]) {}
}

/// Command sink that sends the results of charstring evaluation to a [Pen].
pub struct PenSink<'a, P>(&'a mut P);

impl<'a, P> PenSink<'a, P> {
    pub fn new(pen: &'a mut P) -> Self {
        Self(pen)
    }
}

impl<P> CommandSink for PenSink<'_, P>
where
    P: Pen,
{
    fn move_to(&mut self, x: Fixed, y: Fixed) {
        self.0.move_to(x.to_f32(), y.to_f32());
    }

    fn line_to(&mut self, x: Fixed, y: Fixed) {
        self.0.line_to(x.to_f32(), y.to_f32());
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        self.0.curve_to(
            cx0.to_f32(),
            cy0.to_f32(),
            cx1.to_f32(),
            cy1.to_f32(),
            x.to_f32(),
            y.to_f32(),
        );
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// Evaluates the given charstring and emits the resulting commands to the
/// specified sink.
///
/// If the Private DICT associated with this charstring contains local
/// subroutines, then the `subrs` index must be provided, otherwise
/// `Error::MissingSubroutines` will be returned if a callsubr operator
/// is present.
pub fn evaluate(
    charstring_data: &[u8],
    global_subrs: Index,
    subrs: Option<Index>,
    sink: &mut impl CommandSink,
) -> Result<(), Error> {
    let mut evaluator = Evaluator::new(global_subrs, subrs, sink);
    evaluator.evaluate(charstring_data, 0)?;
    Ok(())
}

/// State for evaluating one glyph's charstring, including any subroutines
/// it calls.
struct Evaluator<'a, S> {
    global_subrs: Index<'a>,
    subrs: Option<Index<'a>>,
    sink: &'a mut S,
    stack: Stack,
    // current point
    x: Fixed,
    y: Fixed,
    is_open: bool,
    width_seen: bool,
    stem_count: usize,
}

/// What to do after evaluating an operator.
enum Flow {
    Continue,
    Return,
    End,
}

impl<'a, S: CommandSink> Evaluator<'a, S> {
    fn new(global_subrs: Index<'a>, subrs: Option<Index<'a>>, sink: &'a mut S) -> Self {
        Self {
            global_subrs,
            subrs,
            sink,
            stack: Stack::new(),
            x: Fixed::ZERO,
            y: Fixed::ZERO,
            is_open: false,
            width_seen: false,
            stem_count: 0,
        }
    }

    /// Returns `Ok(false)` once `endchar` has been seen.
    fn evaluate(&mut self, charstring_data: &[u8], nesting_depth: u32) -> Result<bool, Error> {
        if nesting_depth > NESTING_DEPTH_LIMIT {
            return Err(Error::CharstringNestingDepthLimitExceeded);
        }
        let mut cursor = crate::FontData::new(charstring_data).cursor();
        while cursor.remaining_bytes() != 0 {
            let b0 = cursor.read::<u8>()?;
            // operands: see "3.2 Charstring Number Encoding" in the Type 2
            // charstring format
            if b0 == 28 || b0 >= 32 {
                let operand: Number = if b0 == 255 {
                    Fixed::from_bits(cursor.read::<i32>()?).into()
                } else {
                    super::dict::parse_int(&mut cursor, b0)?.into()
                };
                self.stack.push(operand)?;
                continue;
            }
            let operator = Operator::read(&mut cursor, b0)?;
            match self.evaluate_operator(operator, &mut cursor, nesting_depth)? {
                Flow::Continue => {}
                Flow::Return => return Ok(true),
                Flow::End => return Ok(false),
            }
        }
        Ok(true)
    }

    /// The first stack-clearing operator may carry the advance width as an
    /// extra leading operand. Returns the index of the first real operand.
    fn operands_start(&mut self, has_width: bool) -> usize {
        let skip = has_width && !self.width_seen;
        self.width_seen = true;
        skip as usize
    }

    fn move_by(&mut self, dx: Fixed, dy: Fixed) {
        // a new subpath closes the previous one
        if self.is_open {
            self.sink.close();
        }
        self.is_open = true;
        self.x += dx;
        self.y += dy;
        self.sink.move_to(self.x, self.y);
    }

    fn line_by(&mut self, dx: Fixed, dy: Fixed) {
        self.x += dx;
        self.y += dy;
        self.sink.line_to(self.x, self.y);
    }

    /// Emit a curve whose three points are each given relative to the
    /// previous one.
    fn curve_by(&mut self, [dx1, dy1, dx2, dy2, dx3, dy3]: [Fixed; 6]) {
        let (x1, y1) = (self.x + dx1, self.y + dy1);
        let (x2, y2) = (x1 + dx2, y1 + dy2);
        self.x = x2 + dx3;
        self.y = y2 + dy3;
        self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
    }

    /// Report stem hints from (position delta, width) operand pairs
    /// starting at `start`.
    fn stems(&mut self, start: usize, horizontal: bool) -> Result<(), Error> {
        let mut edge = Fixed::ZERO;
        for i in (start..self.stack.len().saturating_sub(1)).step_by(2) {
            let [delta, width] = self.stack.get_fixed_array::<2>(i)?;
            let low = edge.wrapping_add(delta);
            edge = low.wrapping_add(width);
            if horizontal {
                self.sink.hstem(low, edge);
            } else {
                self.sink.vstem(low, edge);
            }
            self.stem_count += 1;
        }
        Ok(())
    }

    fn evaluate_operator(
        &mut self,
        operator: Operator,
        cursor: &mut Cursor,
        nesting_depth: u32,
    ) -> Result<Flow, Error> {
        use Operator::*;
        const ZERO: Fixed = Fixed::ZERO;
        let len = self.stack.len();
        match operator {
            HStem | VStem | HStemHm | VStemHm => {
                let start = self.operands_start(self.stack.len_is_odd());
                self.stems(start, matches!(operator, HStem | HStemHm))?;
            }
            // operands before a mask are an implied vstemhm
            HintMask | CntrMask => {
                let start = self.operands_start(self.stack.len_is_odd());
                self.stems(start, false)?;
                let mask = cursor.read_bytes(self.stem_count.div_ceil(8))?;
                if operator == HintMask {
                    self.sink.hint_mask(mask);
                } else {
                    self.sink.counter_mask(mask);
                }
            }
            RMoveTo => {
                let start = self.operands_start(len == 3);
                let [dx, dy] = self.stack.get_fixed_array::<2>(start)?;
                self.move_by(dx, dy);
            }
            HMoveTo => {
                let start = self.operands_start(len == 2);
                let dx = self.stack.get_fixed(start)?;
                self.move_by(dx, ZERO);
            }
            VMoveTo => {
                let start = self.operands_start(len == 2);
                let dy = self.stack.get_fixed(start)?;
                self.move_by(ZERO, dy);
            }
            RLineTo => {
                for i in (0..len).step_by(2) {
                    let [dx, dy] = self.stack.get_fixed_array::<2>(i)?;
                    self.line_by(dx, dy);
                }
            }
            // alternating horizontal and vertical lines
            HLineTo | VLineTo => {
                for i in 0..len {
                    let delta = self.stack.get_fixed(i)?;
                    if (i % 2 == 0) == (operator == HLineTo) {
                        self.line_by(delta, ZERO);
                    } else {
                        self.line_by(ZERO, delta);
                    }
                }
            }
            RrCurveTo | RCurveLine => {
                let mut i = 0;
                while i + 6 <= len {
                    self.curve_by(self.stack.get_fixed_array::<6>(i)?);
                    i += 6;
                }
                if operator == RCurveLine {
                    let [dx, dy] = self.stack.get_fixed_array::<2>(i)?;
                    self.line_by(dx, dy);
                }
            }
            RLineCurve => {
                let mut i = 0;
                while i + 6 < len {
                    let [dx, dy] = self.stack.get_fixed_array::<2>(i)?;
                    self.line_by(dx, dy);
                    i += 2;
                }
                self.curve_by(self.stack.get_fixed_array::<6>(i)?);
            }
            // horizontal end tangents; an odd count starts with a dy
            HhCurveTo => {
                let mut i = len % 2;
                let mut dy1 = if i == 1 { self.stack.get_fixed(0)? } else { ZERO };
                while i + 4 <= len {
                    let [dx1, dx2, dy2, dx3] = self.stack.get_fixed_array::<4>(i)?;
                    self.curve_by([dx1, dy1, dx2, dy2, dx3, ZERO]);
                    dy1 = ZERO;
                    i += 4;
                }
            }
            // vertical end tangents; an odd count starts with a dx
            VvCurveTo => {
                let mut i = len % 2;
                let mut dx1 = if i == 1 { self.stack.get_fixed(0)? } else { ZERO };
                while i + 4 <= len {
                    let [dy1, dx2, dy2, dy3] = self.stack.get_fixed_array::<4>(i)?;
                    self.curve_by([dx1, dy1, dx2, dy2, ZERO, dy3]);
                    dx1 = ZERO;
                    i += 4;
                }
            }
            // tangents alternate between horizontal and vertical
            HvCurveTo | VhCurveTo => {
                let mut horizontal = operator == HvCurveTo;
                let mut i = 0;
                while i + 4 <= len {
                    let [a, b, c, d] = self.stack.get_fixed_array::<4>(i)?;
                    // the final curve may carry one extra operand
                    let extra = if len - i == 5 {
                        self.stack.get_fixed(i + 4)?
                    } else {
                        ZERO
                    };
                    if horizontal {
                        self.curve_by([a, ZERO, b, c, extra, d]);
                    } else {
                        self.curve_by([ZERO, a, b, c, d, extra]);
                    }
                    horizontal = !horizontal;
                    i += 4;
                }
            }
            // The flex operators may render as a line at small sizes; like
            // FreeType we always emit both curves.
            Flex => {
                let args = self.stack.get_fixed_array::<12>(0)?;
                self.curve_by([args[0], args[1], args[2], args[3], args[4], args[5]]);
                self.curve_by([args[6], args[7], args[8], args[9], args[10], args[11]]);
            }
            HFlex => {
                let [dx1, dx2, dy2, dx3, dx4, dx5, dx6] = self.stack.get_fixed_array::<7>(0)?;
                self.curve_by([dx1, ZERO, dx2, dy2, dx3, ZERO]);
                self.curve_by([dx4, ZERO, dx5, ZERO - dy2, dx6, ZERO]);
            }
            HFlex1 => {
                let [dx1, dy1, dx2, dy2, dx3, dx4, dx5, dy5, dx6] =
                    self.stack.get_fixed_array::<9>(0)?;
                let start_y = self.y;
                self.curve_by([dx1, dy1, dx2, dy2, dx3, ZERO]);
                // ends at the starting height
                let dy6 = start_y - (self.y + dy5);
                self.curve_by([dx4, ZERO, dx5, dy5, dx6, dy6]);
            }
            Flex1 => {
                let args = self.stack.get_fixed_array::<11>(0)?;
                let (start_x, start_y) = (self.x, self.y);
                self.curve_by([args[0], args[1], args[2], args[3], args[4], args[5]]);
                let x5 = self.x + args[6] + args[8];
                let y5 = self.y + args[7] + args[9];
                // the last operand moves along the dominant axis; the other
                // coordinate returns to the start
                let (dx6, dy6) = if (x5 - start_x).abs() > (y5 - start_y).abs() {
                    (args[10], start_y - y5)
                } else {
                    (start_x - x5, args[10])
                };
                self.curve_by([args[6], args[7], args[8], args[9], dx6, dy6]);
            }
            CallSubr | CallGsubr => {
                let subrs = if operator == CallSubr {
                    self.subrs.clone().ok_or(Error::MissingSubroutines)?
                } else {
                    self.global_subrs.clone()
                };
                let index = self.stack.pop_i32()? as i64 + subrs.subr_bias() as i64;
                let index = usize::try_from(index).map_err(|_| crate::ReadError::OutOfBounds)?;
                let subr_data = subrs.get(index)?;
                // the subroutine works on the same stack
                return Ok(if self.evaluate(subr_data, nesting_depth + 1)? {
                    Flow::Continue
                } else {
                    Flow::End
                });
            }
            Return => return Ok(Flow::Return),
            EndChar => {
                if !self.stack.is_empty() {
                    self.operands_start(true);
                }
                if self.is_open {
                    self.is_open = false;
                    self.sink.close();
                }
                self.stack.clear();
                return Ok(Flow::End);
            }
        }
        self.stack.clear();
        Ok(Flow::Continue)
    }
}

/// Type 2 charstring operators.
///
/// The deprecated arithmetic and storage operators are not supported.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    CallSubr,
    Return,
    EndChar,
    HStemHm,
    HintMask,
    CntrMask,
    RMoveTo,
    HMoveTo,
    VStemHm,
    RCurveLine,
    RLineCurve,
    VvCurveTo,
    HhCurveTo,
    CallGsubr,
    VhCurveTo,
    HvCurveTo,
    HFlex,
    Flex,
    HFlex1,
    Flex1,
}

impl Operator {
    /// Opcode 12 escapes to a second byte.
    const ESCAPE: u8 = 12;

    fn read(cursor: &mut Cursor, b0: u8) -> Result<Self, Error> {
        use Operator::*;
        let escaped = if b0 == Self::ESCAPE {
            Some(cursor.read::<u8>()?)
        } else {
            None
        };
        Ok(match (b0, escaped) {
            (_, Some(34)) => HFlex,
            (_, Some(35)) => Flex,
            (_, Some(36)) => HFlex1,
            (_, Some(37)) => Flex1,
            (_, Some(b1)) => return Err(Error::InvalidCharstringOperator(b1)),
            (1, None) => HStem,
            (3, None) => VStem,
            (4, None) => VMoveTo,
            (5, None) => RLineTo,
            (6, None) => HLineTo,
            (7, None) => VLineTo,
            (8, None) => RrCurveTo,
            (10, None) => CallSubr,
            (11, None) => Return,
            (14, None) => EndChar,
            (18, None) => HStemHm,
            (19, None) => HintMask,
            (20, None) => CntrMask,
            (21, None) => RMoveTo,
            (22, None) => HMoveTo,
            (23, None) => VStemHm,
            (24, None) => RCurveLine,
            (25, None) => RLineCurve,
            (26, None) => VvCurveTo,
            (27, None) => HhCurveTo,
            (29, None) => CallGsubr,
            (30, None) => VhCurveTo,
            (31, None) => HvCurveTo,
            (b0, None) => return Err(Error::InvalidCharstringOperator(b0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::be_buffer;

    #[derive(Copy, Clone, PartialEq, Debug)]
    enum Command {
        MoveTo(Fixed, Fixed),
        LineTo(Fixed, Fixed),
        CurveTo(Fixed, Fixed, Fixed, Fixed, Fixed, Fixed),
        Close,
    }

    #[derive(PartialEq, Default, Debug)]
    struct CaptureCommandSink {
        commands: Vec<Command>,
        stems: usize,
    }

    impl CommandSink for CaptureCommandSink {
        fn move_to(&mut self, x: Fixed, y: Fixed) {
            self.commands.push(Command::MoveTo(x, y))
        }

        fn line_to(&mut self, x: Fixed, y: Fixed) {
            self.commands.push(Command::LineTo(x, y))
        }

        fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
            self.commands
                .push(Command::CurveTo(cx0, cy0, cx1, cy1, x, y))
        }

        fn close(&mut self) {
            self.commands.push(Command::Close)
        }

        fn hstem(&mut self, _y: Fixed, _dy: Fixed) {
            self.stems += 1;
        }
    }

    fn fx(v: i32) -> Fixed {
        Fixed::from_i32(v)
    }

    fn empty_index() -> Index<'static> {
        Index::new(&[0, 0]).unwrap()
    }

    #[test]
    fn triangle_with_width() {
        use Command::*;
        // 100 (width) 10 20 rmoveto 100 0 rlineto -50 80 rlineto endchar
        let charstring = [
            239, 149, 159, 21, 239, 139, 5, 89, 219, 5, 14,
        ];
        let mut sink = CaptureCommandSink::default();
        evaluate(&charstring, empty_index(), None, &mut sink).unwrap();
        let expected = [
            MoveTo(fx(10), fx(20)),
            LineTo(fx(110), fx(20)),
            LineTo(fx(60), fx(100)),
            Close,
        ];
        assert_eq!(&sink.commands, &expected);
    }

    #[test]
    fn local_subroutine() {
        use Command::*;
        // subr 0: 50 0 50 50 -50 0 rrcurveto return
        let subrs = be_buffer! {
            1u16, 1u8, [1u8, 9],
            [189u8, 139, 189, 189, 89, 139, 8, 11]
        };
        let subrs = Index::new(&subrs).unwrap();
        // 5 5 rmoveto -107 callsubr endchar
        let charstring = [144, 144, 21, 32, 10, 14];
        let mut sink = CaptureCommandSink::default();
        evaluate(&charstring, empty_index(), Some(subrs), &mut sink).unwrap();
        let expected = [
            MoveTo(fx(5), fx(5)),
            CurveTo(fx(55), fx(5), fx(105), fx(55), fx(55), fx(55)),
            Close,
        ];
        assert_eq!(&sink.commands, &expected);
    }

    #[test]
    fn missing_local_subroutines() {
        let charstring = [32, 10, 14];
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&charstring, empty_index(), None, &mut sink),
            Err(Error::MissingSubroutines)
        );
    }

    #[test]
    fn recursion_is_bounded() {
        // subr 0 calls itself forever
        let subrs = be_buffer! { 1u16, 1u8, [1u8, 3], [32u8, 10] };
        let subrs = Index::new(&subrs).unwrap();
        let charstring = [32, 10, 14];
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&charstring, empty_index(), Some(subrs), &mut sink),
            Err(Error::CharstringNestingDepthLimitExceeded)
        );
    }

    #[test]
    fn stems_and_hintmask() {
        // 10 20 30 40 hstem 0 0 rmoveto with hintmask (2 stems, 1 byte mask)
        let charstring = [149, 159, 169, 179, 1, 19, 0xC0, 139, 139, 21, 14];
        let mut sink = CaptureCommandSink::default();
        evaluate(&charstring, empty_index(), None, &mut sink).unwrap();
        assert_eq!(sink.stems, 2);
        assert_eq!(sink.commands, vec![Command::MoveTo(fx(0), fx(0)), Command::Close]);
    }

    #[test]
    fn invalid_operator() {
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&[0], empty_index(), None, &mut sink),
            Err(Error::InvalidCharstringOperator(0))
        );
    }

    #[test]
    fn hv_curves() {
        use Command::*;
        // 0 0 rmoveto 10 10 10 10 hvcurveto
        let charstring = [139, 139, 21, 149, 149, 149, 149, 31, 14];
        let mut sink = CaptureCommandSink::default();
        evaluate(&charstring, empty_index(), None, &mut sink).unwrap();
        assert_eq!(
            sink.commands[1],
            CurveTo(fx(10), fx(0), fx(20), fx(10), fx(20), fx(20))
        );
    }

    #[test]
    fn hflex_returns_to_start_height() {
        use Command::*;
        // 0 0 rmoveto 10 10 10 10 10 10 10 hflex endchar
        let charstring = [139, 139, 21, 149, 149, 149, 149, 149, 149, 149, 12, 34, 14];
        let mut sink = CaptureCommandSink::default();
        evaluate(&charstring, empty_index(), None, &mut sink).unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(fx(0), fx(0)),
                CurveTo(fx(10), fx(0), fx(20), fx(10), fx(30), fx(10)),
                CurveTo(fx(40), fx(10), fx(50), fx(0), fx(60), fx(0)),
                Close,
            ]
        );
    }

    #[test]
    fn invalid_escaped_operator() {
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&[12, 3], empty_index(), None, &mut sink),
            Err(Error::InvalidCharstringOperator(3))
        );
    }
}
