use crate::Coord;
use Direction::*;

pub const BODY_GLYPH: &str = "🟩";
pub const APPLE_GLYPH: &str = "🍎";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub fn new(x: Coord, y: Coord) -> Self {
        Position { x, y }
    }

    pub fn offset(self, (dx, dy): (Coord, Coord)) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }

    /// A cell covers its own column and the one on either side, since
    /// every glyph is drawn two columns wide.
    pub fn overlaps(self, other: Position) -> bool {
        self.y == other.y && (self.x - other.x).abs() <= 1
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Cells are two columns wide, so horizontal steps move by 2.
    pub fn delta(self) -> (Coord, Coord) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-2, 0),
            Right => (2, 0),
        }
    }
}

pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
    stock: u32,
}

impl Snake {
    /// Builds a snake whose head is at `head` and whose body trails away
    /// from the direction of travel.
    pub fn new(head: Position, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();

        let body = (0..size as Coord)
            .map(|i| Position::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { body, direction, stock: 0 }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// No reversal check: turning back onto the neck is a legal move that
    /// ends the game on the next step.
    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = new_direction;
    }

    pub fn grow(&mut self) {
        self.stock += 1;
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.iter().any(|seg| seg.overlaps(pos))
    }

    /// The cell one step ahead of the head, before wrap-around.
    pub fn advance_head(&self) -> Position {
        self.head().offset(self.direction.delta())
    }

    /// Moves the body one step with `new_head` as the new head cell. When
    /// stock is owed, the old tail is kept and the snake grows by one.
    pub fn step(&mut self, new_head: Position) {
        if self.stock > 0 {
            let tail = *self.body.last().unwrap_or(&new_head);
            self.body.push(tail);
            self.stock -= 1;
        }

        self.body.rotate_right(1);
        self.body[0] = new_head;
    }

    /// Whether the head overlaps any segment behind it.
    pub fn head_collides(&self) -> bool {
        let head = self.head();
        self.body[1..].iter().any(|seg| seg.overlaps(head))
    }

    pub fn head_glyph(&self) -> &'static str {
        match self.direction {
            Up => "🔼",
            Down => "🔽",
            Left => "◀️ ",
            Right => "▶️ ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_at(x: Coord, y: Coord) -> Snake {
        Snake::new(Position::new(x, y), 5, Left)
    }

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = snake_at(10, 5);
        let xs: Vec<Coord> = snake.body().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![10, 12, 14, 16, 18]);
        assert!(snake.body().iter().all(|p| p.y == 5));

        let snake = Snake::new(Position::new(4, 4), 3, Down);
        let ys: Vec<Coord> = snake.body().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![4, 3, 2]);
    }

    #[test]
    fn occupancy_tolerates_one_column_either_side() {
        let snake = snake_at(10, 5);
        for seg in snake.body() {
            assert!(snake.occupies(Position::new(seg.x - 1, 5)));
            assert!(snake.occupies(*seg));
            assert!(snake.occupies(Position::new(seg.x + 1, 5)));
        }

        assert!(!snake.occupies(Position::new(8, 5)));
        assert!(!snake.occupies(Position::new(20, 5)));
        assert!(!snake.occupies(Position::new(10, 4)));
        assert!(!snake.occupies(Position::new(10, 6)));
    }

    #[test]
    fn advance_head_steps_by_direction() {
        let mut snake = snake_at(10, 5);
        assert_eq!(snake.advance_head(), Position::new(8, 5));
        snake.set_direction(Right);
        assert_eq!(snake.advance_head(), Position::new(12, 5));
        snake.set_direction(Up);
        assert_eq!(snake.advance_head(), Position::new(10, 4));
        snake.set_direction(Down);
        assert_eq!(snake.advance_head(), Position::new(10, 6));
    }

    #[test]
    fn step_without_stock_keeps_length() {
        let mut snake = snake_at(10, 5);
        snake.step(Position::new(8, 5));
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Position::new(8, 5));
        assert_eq!(snake.body()[1], Position::new(10, 5));
        assert_eq!(*snake.body().last().unwrap(), Position::new(16, 5));
    }

    #[test]
    fn step_with_stock_grows_by_one() {
        let mut snake = snake_at(10, 5);
        snake.grow();
        snake.grow();
        assert_eq!(snake.stock(), 2);

        snake.step(Position::new(8, 5));
        assert_eq!(snake.len(), 6);
        assert_eq!(snake.stock(), 1);
        assert_eq!(*snake.body().last().unwrap(), Position::new(18, 5));

        snake.step(Position::new(6, 5));
        assert_eq!(snake.len(), 7);
        assert_eq!(snake.stock(), 0);

        snake.step(Position::new(4, 5));
        assert_eq!(snake.len(), 7);
    }

    #[test]
    fn head_does_not_collide_with_itself() {
        let mut snake = snake_at(10, 5);
        assert!(!snake.head_collides());
        snake.step(snake.advance_head());
        assert!(!snake.head_collides());
    }

    #[test]
    fn reversing_onto_the_neck_collides() {
        let mut snake = snake_at(10, 5);
        snake.set_direction(Right);
        snake.step(snake.advance_head());
        assert!(snake.head_collides());
    }
}
